//! Supported database backends and connection endpoint formatting

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Database backend a datamart can be loaded into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseKind {
    MySql,
    PostgreSql,
    MsSql,
}

impl DatabaseKind {
    /// Name used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseKind::MySql => "mysql",
            DatabaseKind::PostgreSql => "postgresql",
            DatabaseKind::MsSql => "mssql",
        }
    }

    /// URL scheme of the endpoint string, including the driver suffix
    pub fn scheme(&self) -> &'static str {
        match self {
            DatabaseKind::MySql => "mysql+sqlx",
            DatabaseKind::PostgreSql => "postgresql",
            DatabaseKind::MsSql => "mssql+tiberius",
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DatabaseKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(DatabaseKind::MySql),
            "postgresql" | "postgres" => Ok(DatabaseKind::PostgreSql),
            "mssql" => Ok(DatabaseKind::MsSql),
            _ => Err(ConfigError::UnsupportedDatabaseType(s.to_string())),
        }
    }
}

/// Format the connection endpoint for `kind`
///
/// Credentials are substituted verbatim, no percent-encoding is applied.
pub fn resolve_endpoint(
    kind: DatabaseKind,
    user: &str,
    password: &str,
    host: &str,
    schema: &str,
) -> String {
    format!(
        "{}://{}:{}@{}/{}",
        kind.scheme(),
        user,
        password,
        host,
        schema
    )
}

/// Everything needed to reach the target database
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub kind: DatabaseKind,
    pub host: String,
    pub user: String,
    pub password: String,
    /// Database (schema) the connection opens on
    pub schema: String,
}

impl ConnectionDescriptor {
    pub fn endpoint(&self) -> String {
        resolve_endpoint(
            self.kind,
            &self.user,
            &self.password,
            &self.host,
            &self.schema,
        )
    }

    /// Endpoint with the password replaced, for logs and dry runs
    pub fn masked_endpoint(&self) -> String {
        let password = if self.password.is_empty() { "" } else { "***" };
        resolve_endpoint(self.kind, &self.user, password, &self.host, &self.schema)
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("kind", &self.kind)
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .field("schema", &self.schema)
            .finish()
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked_endpoint())
    }
}
