mod cli;
mod config;
mod datamart;
mod db;
mod error;
mod pipeline;
mod spreadsheet;

use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    cli::handle(cli).await
}

/// `RUST_LOG` wins; otherwise info, debug or trace depending on `-v` count
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
