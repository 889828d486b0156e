//! SQL text for each backend: identifier quoting, schema and table DDL, inserts

use std::str::FromStr;

use super::kind::DatabaseKind;
use crate::error::ConfigError;
use crate::spreadsheet::{ColumnDef, ColumnType};

/// MySQL schema statement, with `{datamart_name}` substituted as-is
pub const MYSQL_CREATE_SCHEMA_SQL: &str = "CREATE SCHEMA IF NOT EXISTS {datamart_name} \
     DEFAULT CHARSET utf8mb4 DEFAULT COLLATE utf8mb4_unicode_ci";

/// Which schema-creation statement to send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaSql {
    /// Statement matching the selected backend
    #[default]
    PerBackend,
    /// Always the MySQL statement, whatever the backend
    MySql,
}

impl FromStr for SchemaSql {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "per-backend" => Ok(SchemaSql::PerBackend),
            "mysql" => Ok(SchemaSql::MySql),
            _ => Err(ConfigError::UnsupportedSchemaSql(s.to_string())),
        }
    }
}

/// Quote an identifier for `kind`, doubling embedded quote characters
pub fn quote_ident(kind: DatabaseKind, ident: &str) -> String {
    match kind {
        DatabaseKind::MySql => format!("`{}`", ident.replace('`', "``")),
        DatabaseKind::PostgreSql => format!("\"{}\"", ident.replace('"', "\"\"")),
        DatabaseKind::MsSql => format!("[{}]", ident.replace(']', "]]")),
    }
}

/// `schema.table`, both parts quoted
pub fn qualified_table(kind: DatabaseKind, schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(kind, schema), quote_ident(kind, table))
}

/// Create-if-not-exists statement for the datamart schema
pub fn create_schema_sql(kind: DatabaseKind, datamart_name: &str, mode: SchemaSql) -> String {
    let kind = match mode {
        SchemaSql::MySql => DatabaseKind::MySql,
        SchemaSql::PerBackend => kind,
    };

    match kind {
        DatabaseKind::MySql => MYSQL_CREATE_SCHEMA_SQL.replace("{datamart_name}", datamart_name),
        DatabaseKind::PostgreSql => format!(
            "CREATE SCHEMA IF NOT EXISTS {}",
            quote_ident(kind, datamart_name)
        ),
        DatabaseKind::MsSql => format!(
            "IF SCHEMA_ID(N'{}') IS NULL EXEC('CREATE SCHEMA {}')",
            datamart_name.replace('\'', "''"),
            quote_ident(kind, datamart_name).replace('\'', "''")
        ),
    }
}

/// Column type name for `kind`
pub fn column_type_sql(kind: DatabaseKind, column_type: ColumnType) -> &'static str {
    match (kind, column_type) {
        (_, ColumnType::Integer) => "BIGINT",
        (DatabaseKind::MySql, ColumnType::Float) => "DOUBLE",
        (DatabaseKind::PostgreSql, ColumnType::Float) => "DOUBLE PRECISION",
        (DatabaseKind::MsSql, ColumnType::Float) => "FLOAT(53)",
        (DatabaseKind::MySql, ColumnType::Boolean) => "BOOLEAN",
        (DatabaseKind::PostgreSql, ColumnType::Boolean) => "BOOLEAN",
        (DatabaseKind::MsSql, ColumnType::Boolean) => "BIT",
        (DatabaseKind::MySql, ColumnType::Text) => "TEXT",
        (DatabaseKind::PostgreSql, ColumnType::Text) => "TEXT",
        (DatabaseKind::MsSql, ColumnType::Text) => "NVARCHAR(MAX)",
        (DatabaseKind::MySql, ColumnType::Timestamp) => "DATETIME",
        (DatabaseKind::PostgreSql, ColumnType::Timestamp) => "TIMESTAMP",
        (DatabaseKind::MsSql, ColumnType::Timestamp) => "DATETIME2",
    }
}

/// Statement that creates the destination table only when it is absent
pub fn create_table_sql(
    kind: DatabaseKind,
    schema: &str,
    table: &str,
    columns: &[ColumnDef],
) -> String {
    let qualified = qualified_table(kind, schema, table);
    let column_list = columns
        .iter()
        .map(|c| {
            format!(
                "{} {}",
                quote_ident(kind, &c.name),
                column_type_sql(kind, c.column_type)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    match kind {
        DatabaseKind::MySql | DatabaseKind::PostgreSql => {
            format!("CREATE TABLE IF NOT EXISTS {} ({})", qualified, column_list)
        }
        DatabaseKind::MsSql => format!(
            "IF OBJECT_ID(N'{}', N'U') IS NULL CREATE TABLE {} ({})",
            qualified.replace('\'', "''"),
            qualified,
            column_list
        ),
    }
}

/// Single-row parameterised insert into the destination table
pub fn insert_sql(kind: DatabaseKind, schema: &str, table: &str, columns: &[ColumnDef]) -> String {
    let names = columns
        .iter()
        .map(|c| quote_ident(kind, &c.name))
        .collect::<Vec<_>>()
        .join(", ");

    let placeholders = (1..=columns.len())
        .map(|i| match kind {
            DatabaseKind::MySql => "?".to_string(),
            DatabaseKind::PostgreSql => format!("${}", i),
            DatabaseKind::MsSql => format!("@P{}", i),
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        qualified_table(kind, schema, table),
        names,
        placeholders
    )
}
