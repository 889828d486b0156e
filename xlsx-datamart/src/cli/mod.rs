//! Command-line interface

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

use crate::config::{
    DatabaseSection, DatamartSection, FileConfig, Settings, SourceSection, default_config_path,
};
use crate::datamart::ProvisionOutcome;
use crate::db::DriverConnector;
use crate::pipeline;

/// Load one spreadsheet sheet into a database datamart
#[derive(Parser, Debug)]
#[command(name = "xlsx-datamart", version, about)]
pub struct Cli {
    /// TOML config file (defaults to the per-user config file if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the workbook
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Workbook name without the .xlsx extension
    #[arg(short, long)]
    pub workbook: Option<String>,

    /// Sheet to load
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// Column used as the row index
    #[arg(short, long)]
    pub index: Option<String>,

    /// Database kind: mysql, postgresql or mssql
    #[arg(long)]
    pub db_kind: Option<String>,

    /// Database host, optionally with :port
    #[arg(long)]
    pub host: Option<String>,

    /// Database user
    #[arg(short, long)]
    pub user: Option<String>,

    /// Database password
    #[arg(long, env = "XLSX_DATAMART_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database (schema) to connect to
    #[arg(long)]
    pub db_schema: Option<String>,

    /// Datamart schema to create and load into
    #[arg(short, long)]
    pub datamart: Option<String>,

    /// Destination table name
    #[arg(short, long)]
    pub table: Option<String>,

    /// Schema statement: per-backend, or mysql to always send the MySQL form
    #[arg(long)]
    pub schema_sql: Option<String>,

    /// Read the sheet and print the statements without touching the database
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Flag values as a config layer to put over the file
    fn overrides(&self) -> FileConfig {
        FileConfig {
            source: SourceSection {
                input_dir: self.input_dir.clone(),
                workbook: self.workbook.clone(),
                sheet: self.sheet.clone(),
                index_column: self.index.clone(),
            },
            database: DatabaseSection {
                kind: self.db_kind.clone(),
                host: self.host.clone(),
                user: self.user.clone(),
                password: self.password.clone(),
                schema: self.db_schema.clone(),
            },
            datamart: DatamartSection {
                name: self.datamart.clone(),
                table: self.table.clone(),
                schema_sql: self.schema_sql.clone(),
            },
        }
    }

    /// Config file (explicit or default) overlaid with the flags
    fn settings(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => {
                    log::debug!("Using config file {}", path.display());
                    FileConfig::load(&path)?
                }
                None => FileConfig::default(),
            },
        };

        let settings = Settings::resolve(file.merge(self.overrides()))?;
        Ok(settings)
    }
}

/// Execute the command described by `cli`
pub async fn handle(cli: Cli) -> Result<()> {
    let settings = cli.settings().context("Invalid configuration")?;

    if cli.dry_run {
        let table = pipeline::read_source(&settings)?;
        let plan = pipeline::plan(&settings, &table);

        println!("{} {}", "Endpoint:".bold(), plan.endpoint.cyan());
        println!("{} {}", "Rows:".bold(), plan.rows);
        println!("{}", "Schema statement:".bold());
        println!("  {}", plan.schema_sql.dimmed());
        println!("{}", "Table statement:".bold());
        println!("  {}", plan.create_table_sql.dimmed());
        return Ok(());
    }

    let report = pipeline::run(&settings, &DriverConnector).await?;

    if let ProvisionOutcome::Failed(message) = &report.provision {
        println!(
            "{} datamart '{}' was not created: {}",
            "warning:".yellow().bold(),
            settings.datamart.name,
            message
        );
    }
    println!(
        "{} {} of {} rows into {}.{}",
        "Loaded".green().bold(),
        report.rows_written,
        report.rows_read,
        settings.datamart.name.bright_white(),
        settings.datamart.table.bright_white()
    );

    Ok(())
}
