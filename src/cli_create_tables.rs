//! Drops and recreates the warehouse tables.

use anyhow::{Context, Result};
use clap::Parser;
use sparkify_etl::warehouse::SONGPLAY_SCHEMA;
use sparkify_etl::Warehouse;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "create-tables")]
#[command(about = "Drop and recreate the songplay warehouse tables")]
struct Args {
    /// Path to the SQLite warehouse database file
    #[arg(value_name = "DB_PATH", default_value = "sparkify.db")]
    db_path: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    Warehouse::recreate(&args.db_path)
        .with_context(|| format!("Failed to recreate tables in {}", args.db_path.display()))?;

    for table in SONGPLAY_SCHEMA.tables {
        info!("Created table {}", table.name);
    }
    Ok(())
}
