//! Error types for each stage of the load

use std::path::PathBuf;

use thiserror::Error;

/// Invalid or incomplete configuration, detected before any I/O
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "Unsupported database type '{0}'. Choose from mysql, postgresql or mssql."
    )]
    UnsupportedDatabaseType(String),

    #[error("Unsupported schema statement mode '{0}'. Choose from per-backend or mysql.")]
    UnsupportedSchemaSql(String),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Failures while reading the source sheet
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Spreadsheet not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to open workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("Sheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Column '{column}' not found in sheet '{sheet}'")]
    ColumnNotFound { column: String, sheet: String },
}

/// Failures talking to the target database
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid connection endpoint '{endpoint}': {reason}")]
    Endpoint { endpoint: String, reason: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Mssql(#[from] tiberius::error::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while appending rows to the destination table
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to write {table}: {source}")]
    Write {
        table: String,
        #[source]
        source: DbError,
    },
}
