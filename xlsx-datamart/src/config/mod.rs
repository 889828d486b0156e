//! Run configuration
//!
//! Settings come from an optional TOML file and command-line overrides. The
//! raw, all-optional [`FileConfig`] is resolved into typed [`Settings`] before
//! anything touches the filesystem or the network.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::db::{ConnectionDescriptor, DatabaseKind, SchemaSql};
use crate::error::ConfigError;

/// Directory workbooks are read from unless configured otherwise
pub const DEFAULT_INPUT_DIR: &str = "place-xlsx-here";
/// Destination table name unless configured otherwise
pub const DEFAULT_TABLE: &str = "xlsx_import";
/// Backend used when no kind is given
pub const DEFAULT_KIND: DatabaseKind = DatabaseKind::MySql;

const APP_DIR: &str = "xlsx-datamart";
const CONFIG_FILE: &str = "config.toml";

/// `[source]` section
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSection {
    pub input_dir: Option<PathBuf>,
    pub workbook: Option<String>,
    pub sheet: Option<String>,
    pub index_column: Option<String>,
}

/// `[database]` section
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSection {
    pub kind: Option<String>,
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub schema: Option<String>,
}

/// `[datamart]` section
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DatamartSection {
    pub name: Option<String>,
    pub table: Option<String>,
    pub schema_sql: Option<String>,
}

/// Configuration as written in the file, every value optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub source: SourceSection,
    pub database: DatabaseSection,
    pub datamart: DatamartSection,
}

impl FileConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Overlay `other` on top of `self`; values set in `other` win
    pub fn merge(self, other: FileConfig) -> FileConfig {
        FileConfig {
            source: SourceSection {
                input_dir: other.source.input_dir.or(self.source.input_dir),
                workbook: other.source.workbook.or(self.source.workbook),
                sheet: other.source.sheet.or(self.source.sheet),
                index_column: other.source.index_column.or(self.source.index_column),
            },
            database: DatabaseSection {
                kind: other.database.kind.or(self.database.kind),
                host: other.database.host.or(self.database.host),
                user: other.database.user.or(self.database.user),
                password: other.database.password.or(self.database.password),
                schema: other.database.schema.or(self.database.schema),
            },
            datamart: DatamartSection {
                name: other.datamart.name.or(self.datamart.name),
                table: other.datamart.table.or(self.datamart.table),
                schema_sql: other.datamart.schema_sql.or(self.datamart.schema_sql),
            },
        }
    }
}

/// Per-user config file location, e.g. `~/.config/xlsx-datamart/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Where the source sheet comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    pub input_dir: PathBuf,
    pub workbook: String,
    pub sheet: String,
    pub index_column: String,
}

/// Where the rows go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatamartSettings {
    pub name: String,
    pub table: String,
    pub schema_sql: SchemaSql,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: SourceSettings,
    pub connection: ConnectionDescriptor,
    pub datamart: DatamartSettings,
}

impl Settings {
    /// Validate and type the raw configuration
    ///
    /// The database kind is checked first so an unsupported backend is
    /// reported even when other values are missing.
    pub fn resolve(config: FileConfig) -> Result<Self, ConfigError> {
        let kind = match config.database.kind.as_deref() {
            Some(kind) => kind.parse::<DatabaseKind>()?,
            None => DEFAULT_KIND,
        };
        let schema_sql = match config.datamart.schema_sql.as_deref() {
            Some(mode) => mode.parse::<SchemaSql>()?,
            None => SchemaSql::default(),
        };

        let source = SourceSettings {
            input_dir: config
                .source
                .input_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR)),
            workbook: required(config.source.workbook, "source.workbook")?,
            sheet: required(config.source.sheet, "source.sheet")?,
            index_column: required(config.source.index_column, "source.index_column")?,
        };

        let connection = ConnectionDescriptor {
            kind,
            host: required(config.database.host, "database.host")?,
            user: config.database.user.unwrap_or_default(),
            password: config.database.password.unwrap_or_default(),
            schema: required(config.database.schema, "database.schema")?,
        };

        let datamart = DatamartSettings {
            name: required(config.datamart.name, "datamart.name")?,
            table: config
                .datamart
                .table
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            schema_sql,
        };

        Ok(Settings {
            source,
            connection,
            datamart,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(field))
}
