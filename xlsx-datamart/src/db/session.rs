//! Backend-independent database session

use async_trait::async_trait;

use super::kind::DatabaseKind;
use super::{mssql, sqlx_backend};
use crate::error::DbError;
use crate::spreadsheet::SqlValue;

/// An open connection to the target database
///
/// Each session owns one physical connection. `close` releases it
/// explicitly; dropping a session without closing also releases it.
#[async_trait]
pub trait Session: Send {
    /// Run a statement without parameters, returning the affected row count
    async fn execute(&mut self, sql: &str) -> Result<u64, DbError>;

    /// Insert `rows` in one transaction, all or nothing
    ///
    /// `insert_sql` is a single-row insert whose placeholders match the
    /// values of each row in order. Returns the number of rows inserted.
    /// Only DML belongs here: MySQL commits implicitly on DDL, so the table
    /// must already exist.
    async fn insert_rows(&mut self, insert_sql: &str, rows: &[Vec<SqlValue>])
    -> Result<u64, DbError>;

    async fn close(self: Box<Self>) -> Result<(), DbError>;
}

/// Opens sessions; the pipeline asks for a fresh one per step
#[async_trait]
pub trait Connector: Send + Sync {
    async fn open(&self, kind: DatabaseKind, endpoint: &str) -> Result<Box<dyn Session>, DbError>;
}

/// Connector backed by the real drivers
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverConnector;

#[async_trait]
impl Connector for DriverConnector {
    async fn open(&self, kind: DatabaseKind, endpoint: &str) -> Result<Box<dyn Session>, DbError> {
        connect(kind, endpoint).await
    }
}

/// Open a session for `kind` using its endpoint string
pub async fn connect(kind: DatabaseKind, endpoint: &str) -> Result<Box<dyn Session>, DbError> {
    let url = driver_url(endpoint);
    log::debug!("Opening {} connection", kind);

    let session: Box<dyn Session> = match kind {
        DatabaseKind::MySql => Box::new(sqlx_backend::connect_mysql(&url).await?),
        DatabaseKind::PostgreSql => Box::new(sqlx_backend::connect_postgres(&url).await?),
        DatabaseKind::MsSql => Box::new(mssql::connect(&url).await?),
    };

    Ok(session)
}

/// Drop the `+driver` part of the endpoint scheme
///
/// `mysql+sqlx://u:p@h/s` becomes `mysql://u:p@h/s`; endpoints without a
/// driver suffix are returned unchanged.
pub fn driver_url(endpoint: &str) -> String {
    match endpoint.split_once("://") {
        Some((scheme, rest)) => {
            let base = scheme.split('+').next().unwrap_or(scheme);
            format!("{}://{}", base, rest)
        }
        None => endpoint.to_string(),
    }
}
