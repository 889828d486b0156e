//! Best-effort creation of the datamart schema

use crate::db::dialect::{SchemaSql, create_schema_sql};
use crate::db::{DatabaseKind, Session};

/// What happened when the schema statement ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Statement succeeded (the schema exists now, or already did)
    Created,
    /// Statement failed; the message was logged and the run continues
    Failed(String),
}

/// Create `datamart_name` if it does not exist
///
/// Errors never escape: they are logged and reported as
/// [`ProvisionOutcome::Failed`], and the load goes ahead regardless.
pub async fn provision_datamart(
    session: &mut dyn Session,
    kind: DatabaseKind,
    datamart_name: &str,
    mode: SchemaSql,
) -> ProvisionOutcome {
    let sql = create_schema_sql(kind, datamart_name, mode);
    log::debug!("Provisioning datamart: {}", sql);

    match session.execute(&sql).await {
        Ok(_) => {
            log::info!("Datamart '{}' is ready", datamart_name);
            ProvisionOutcome::Created
        }
        Err(e) => {
            log::warn!("an error occurred: {}.", e);
            ProvisionOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::db::session::memory::{MemoryDatabase, MemorySession};

    #[tokio::test]
    async fn test_provision_is_idempotent() {
        let db = Arc::new(Mutex::new(MemoryDatabase::default()));
        let mut session = MemorySession::new(db.clone());

        let first =
            provision_datamart(&mut session, DatabaseKind::PostgreSql, "mart", SchemaSql::PerBackend)
                .await;
        let second =
            provision_datamart(&mut session, DatabaseKind::PostgreSql, "mart", SchemaSql::PerBackend)
                .await;

        assert_eq!(first, ProvisionOutcome::Created);
        assert_eq!(second, ProvisionOutcome::Created);

        let db = db.lock().unwrap();
        assert_eq!(db.schemas.len(), 1);
        assert!(db.schemas.contains("mart"));
        assert_eq!(db.statements.len(), 2);
    }

    #[tokio::test]
    async fn test_provision_failure_is_not_fatal() {
        let db = Arc::new(Mutex::new(MemoryDatabase::default()));
        let mut session = MemorySession::failing(db.clone(), "access denied");

        let outcome =
            provision_datamart(&mut session, DatabaseKind::MySql, "mart", SchemaSql::PerBackend)
                .await;

        match outcome {
            ProvisionOutcome::Failed(message) => assert!(message.contains("access denied")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(db.lock().unwrap().schemas.is_empty());
    }

    #[tokio::test]
    async fn test_provision_sends_mysql_literal() {
        let db = Arc::new(Mutex::new(MemoryDatabase::default()));
        let mut session = MemorySession::new(db.clone());

        provision_datamart(&mut session, DatabaseKind::MsSql, "mart", SchemaSql::MySql).await;

        assert_eq!(
            db.lock().unwrap().statements[0],
            "CREATE SCHEMA IF NOT EXISTS mart DEFAULT CHARSET utf8mb4 DEFAULT COLLATE utf8mb4_unicode_ci"
        );
    }
}
