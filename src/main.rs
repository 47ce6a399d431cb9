mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "syncal", version)]
#[command(about = "Sync Google Calendar events to an iCloud calendar")]
struct Cli {
    /// Settings file (default: ~/.config/syncal/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level: debug, info, warn or error
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy new Google events into the iCloud calendar
    Sync {
        /// Run a single sync cycle and exit (the default)
        #[arg(long)]
        once: bool,

        /// Log what would be synced without making changes
        #[arg(long)]
        dry_run: bool,

        /// Run a cycle every N seconds (default from settings). Overrides --once
        #[arg(long, value_name = "SECS", num_args = 0..=1)]
        watch: Option<Option<u64>>,
    },
    /// List the calendars of every Google account with a stored session
    Calendars,
    /// Show where the sync state lives and how many events it records
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&settings.log_level);
    logging::init_logging(level);

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Could not load .env file"),
    }

    match cli.command {
        Commands::Sync {
            once,
            dry_run,
            watch,
        } => {
            let interval = commands::sync::watch_interval(watch, settings.sync.interval_secs)?;
            if once && interval.is_some() {
                tracing::info!("--watch overrides --once");
            }
            commands::sync::run(&settings, dry_run, interval).await
        }
        Commands::Calendars => commands::calendars::run(&settings).await,
        Commands::Status => commands::status::run(&settings),
    }
}
