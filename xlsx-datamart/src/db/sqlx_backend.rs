//! MySQL and PostgreSQL sessions on top of sqlx

use async_trait::async_trait;
use sqlx::mysql::MySqlConnection;
use sqlx::postgres::PgConnection;
use sqlx::{Connection, Executor};

use super::session::Session;
use crate::error::DbError;
use crate::spreadsheet::SqlValue;

pub struct MySqlSession(MySqlConnection);

pub struct PgSession(PgConnection);

pub async fn connect_mysql(url: &str) -> Result<MySqlSession, DbError> {
    let conn = MySqlConnection::connect(url).await?;
    Ok(MySqlSession(conn))
}

pub async fn connect_postgres(url: &str) -> Result<PgSession, DbError> {
    let conn = PgConnection::connect(url).await?;
    Ok(PgSession(conn))
}

/// Bind a typed value; nulls keep their column type
macro_rules! bind_value {
    ($query:expr, $value:expr) => {
        match $value {
            SqlValue::Integer(v) => $query.bind(*v),
            SqlValue::Float(v) => $query.bind(*v),
            SqlValue::Boolean(v) => $query.bind(*v),
            SqlValue::Text(v) => $query.bind(v.clone()),
            SqlValue::Timestamp(v) => $query.bind(*v),
        }
    };
}

macro_rules! impl_sqlx_session {
    ($session:ty, $db:ty) => {
        #[async_trait]
        impl Session for $session {
            async fn execute(&mut self, sql: &str) -> Result<u64, DbError> {
                let result = self.0.execute(sql).await?;
                Ok(result.rows_affected())
            }

            async fn insert_rows(
                &mut self,
                insert_sql: &str,
                rows: &[Vec<SqlValue>],
            ) -> Result<u64, DbError> {
                let mut tx = self.0.begin().await?;

                let mut inserted = 0;
                for row in rows {
                    let mut query = sqlx::query::<$db>(insert_sql);
                    for value in row {
                        query = bind_value!(query, value);
                    }
                    inserted += query.execute(&mut *tx).await?.rows_affected();
                }

                tx.commit().await?;
                Ok(inserted)
            }

            async fn close(self: Box<Self>) -> Result<(), DbError> {
                self.0.close().await?;
                Ok(())
            }
        }
    };
}

impl_sqlx_session!(MySqlSession, sqlx::MySql);
impl_sqlx_session!(PgSession, sqlx::Postgres);
