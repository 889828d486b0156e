//! Target database access
//!
//! `kind` resolves the connection endpoint, `dialect` renders backend-specific
//! SQL and `session` hides the driver behind one trait. MySQL and PostgreSQL
//! go through sqlx, MSSQL through tiberius.

pub mod dialect;
pub mod kind;
pub mod mssql;
pub mod session;
pub mod sqlx_backend;

pub use dialect::SchemaSql;
pub use kind::{ConnectionDescriptor, DatabaseKind};
pub use session::{Connector, DriverConnector, Session};
