use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sparkify_etl::config::{AppConfig, CliConfig, FileConfig};
use sparkify_etl::etl::DEFAULT_CHUNK_SIZE;
use sparkify_etl::{run_pipelines, LoadReport, Warehouse};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "sparkify-etl")]
#[command(about = "Load song and log files into the songplay warehouse")]
struct CliArgs {
    /// Path to a TOML config file. Its values override the CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite warehouse database file.
    #[clap(long, value_parser = parse_path, default_value = "sparkify.db")]
    pub db_path: PathBuf,

    /// Root directory of the song files.
    #[clap(long, value_parser = parse_path, default_value = "data/song_data")]
    pub song_data: PathBuf,

    /// Root directory of the log files.
    #[clap(long, value_parser = parse_path, default_value = "data/log_data")]
    pub log_data: PathBuf,

    /// Maximum number of rows submitted per batch.
    #[clap(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Extension of the source files.
    #[clap(long, default_value = "json")]
    pub file_extension: String,

    /// Drop and recreate all warehouse tables before loading.
    #[clap(long, default_value_t = false)]
    pub reset: bool,
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            db_path: args.db_path.clone(),
            song_data: args.song_data.clone(),
            log_data: args.log_data.clone(),
            chunk_size: args.chunk_size,
            file_extension: args.file_extension.clone(),
            reset: args.reset,
        }
    }
}

fn log_report(label: &str, report: &LoadReport) {
    info!("{} files: {}", label, report.files);
    if report.artists > 0 || report.songs > 0 {
        info!("  artists submitted: {}", report.artists);
        info!("  songs submitted: {}", report.songs);
    }
    if report.songplays > 0 || report.time_rows > 0 {
        info!("  time rows submitted: {}", report.time_rows);
        info!("  users submitted: {}", report.users);
        info!(
            "  songplays submitted: {} ({} matched a song)",
            report.songplays, report.songplays_matched
        );
    }
    if report.ambiguous_lookups > 0 {
        warn!(
            "  {} songplay lookups matched more than one song",
            report.ambiguous_lookups
        );
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&CliConfig::from(&cli_args), file_config)?;

    info!("Opening warehouse database at {:?}...", config.db_path);
    let mut warehouse = if config.reset {
        Warehouse::recreate(&config.db_path)
    } else {
        Warehouse::open(&config.db_path)
    }
    .with_context(|| format!("Failed to open warehouse at {:?}", config.db_path))?;

    let (songs, logs) = run_pipelines(
        &mut warehouse,
        &config.song_data,
        &config.log_data,
        &config.load_settings(),
    )?;

    info!("");
    info!("Load Summary");
    info!("============");
    log_report("Song", &songs);
    log_report("Log", &logs);

    info!("");
    info!("Warehouse contains:");
    for (table, count) in warehouse.table_counts()? {
        info!("  {} {}", count, table);
    }

    Ok(())
}
