//! Append a source table into the destination table

use crate::db::dialect::{create_table_sql, insert_sql};
use crate::db::{DatabaseKind, Session};
use crate::error::LoadError;
use crate::spreadsheet::SourceTable;

/// Write every row of `source` into `schema.table`
///
/// The table is created from the inferred column types when it does not
/// exist; otherwise rows are appended. Nothing is deduplicated, so loading the
/// same table twice doubles its rows. Errors are returned to the caller.
///
/// The create statement runs on its own, ahead of the insert transaction, so
/// a failed insert leaves the (empty) table behind but never partial rows.
pub async fn append_table(
    session: &mut dyn Session,
    kind: DatabaseKind,
    source: &SourceTable,
    schema: &str,
    table: &str,
) -> Result<u64, LoadError> {
    let columns = source.column_defs();
    let create_sql = create_table_sql(kind, schema, table, &columns);
    let insert_sql = insert_sql(kind, schema, table, &columns);
    let rows = source.sql_rows(&columns);

    log::debug!("Destination DDL: {}", create_sql);
    log::info!("Appending {} rows into {}.{}", rows.len(), schema, table);

    let write_error = |e| LoadError::Write {
        table: format!("{}.{}", schema, table),
        source: e,
    };

    session.execute(&create_sql).await.map_err(write_error)?;
    let inserted = session
        .insert_rows(&insert_sql, &rows)
        .await
        .map_err(write_error)?;

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::db::session::memory::{MemoryDatabase, MemorySession};
    use crate::spreadsheet::SqlValue;
    use crate::spreadsheet::table::{CellValue, Row};

    fn source(n: usize) -> SourceTable {
        SourceTable {
            index_column: "id".to_string(),
            columns: vec!["name".to_string()],
            rows: (1..=n)
                .map(|i| Row {
                    index: CellValue::Float(i as f64),
                    cells: vec![CellValue::Text(format!("row {}", i))],
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_append_semantics() {
        let db = Arc::new(Mutex::new(MemoryDatabase::default()));
        let mut session = MemorySession::new(db.clone());
        let table = source(4);

        let first = append_table(&mut session, DatabaseKind::PostgreSql, &table, "mart", "t")
            .await
            .unwrap();
        assert_eq!(first, 4);
        {
            let db = db.lock().unwrap();
            assert_eq!(db.tables.len(), 1);
            assert_eq!(db.tables.values().next().unwrap().len(), 4);
        }

        let second = append_table(&mut session, DatabaseKind::PostgreSql, &table, "mart", "t")
            .await
            .unwrap();
        assert_eq!(second, 4);

        let db = db.lock().unwrap();
        assert_eq!(db.tables.len(), 1);
        let rows = db.tables.values().next().unwrap();
        assert_eq!(rows.len(), 8);
        assert_eq!(
            rows[0],
            vec![SqlValue::Integer(Some(1)), SqlValue::Text(Some("row 1".into()))]
        );
    }

    #[tokio::test]
    async fn test_statements_target_datamart_table() {
        let db = Arc::new(Mutex::new(MemoryDatabase::default()));
        let mut session = MemorySession::new(db.clone());

        append_table(&mut session, DatabaseKind::MySql, &source(1), "mart", "sales")
            .await
            .unwrap();

        let db = db.lock().unwrap();
        assert_eq!(
            db.statements[0],
            "CREATE TABLE IF NOT EXISTS `mart`.`sales` (`id` BIGINT, `name` TEXT)"
        );
        assert_eq!(
            db.statements[1],
            "INSERT INTO `mart`.`sales` (`id`, `name`) VALUES (?, ?)"
        );
    }

    #[tokio::test]
    async fn test_empty_table_still_creates() {
        let db = Arc::new(Mutex::new(MemoryDatabase::default()));
        let mut session = MemorySession::new(db.clone());

        let inserted = append_table(&mut session, DatabaseKind::MsSql, &source(0), "mart", "t")
            .await
            .unwrap();

        assert_eq!(inserted, 0);
        let db = db.lock().unwrap();
        assert_eq!(db.created.len(), 1);
        assert!(db.tables.values().all(|rows| rows.is_empty()));
    }

    #[tokio::test]
    async fn test_failed_insert_commits_no_rows() {
        let db = Arc::new(Mutex::new(MemoryDatabase::default()));
        let mut session = MemorySession::failing_at_row(db.clone(), 1);

        let err = append_table(&mut session, DatabaseKind::MySql, &source(3), "mart", "t")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("mart.t"));

        // Table creation ran before the insert transaction and is kept
        let db = db.lock().unwrap();
        assert_eq!(
            db.statements,
            vec!["CREATE TABLE IF NOT EXISTS `mart`.`t` (`id` BIGINT, `name` TEXT)".to_string()]
        );
        assert_eq!(db.created.len(), 1);
        assert!(db.tables.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let db = Arc::new(Mutex::new(MemoryDatabase::default()));
        let mut session = MemorySession::failing(db.clone(), "permission denied");

        let err = append_table(&mut session, DatabaseKind::PostgreSql, &source(2), "mart", "t")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("mart.t"));
        let db = db.lock().unwrap();
        assert!(db.created.is_empty());
        assert!(db.tables.is_empty());
    }
}
