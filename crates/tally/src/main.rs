//! Tally - Batch aggregation pipeline for web shop event exports
//!
//! # Usage
//!
//! ```bash
//! # Run the pipeline with defaults (./raw_data -> ./aggregated_data)
//! tally
//! tally --config configs/tally.toml
//!
//! # Aggregate a single month
//! tally --start-date 2024-03-01 --end-date 2024-03-31
//! ```

mod cmd;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tally_config::Config;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Tally - Batch aggregation pipeline for web shop event exports
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(flatten)]
    args: cmd::run::RunArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = resolve_log_level(cli.log_level.as_deref(), cli.args.config.as_deref());
    let log_file = resolve_log_file(cli.args.config.as_deref());
    init_logging(&log_level, log_file.as_deref())?;

    cmd::run::run(cli.args).await
}

/// Best-effort config read before logging is up. Load errors surface
/// later through the run command proper.
fn peek_config(config_path: Option<&Path>) -> Option<Config> {
    if let Some(path) = config_path {
        if path.exists()
            && let Ok(config) = Config::from_file(path)
        {
            return Some(config);
        }
        return None;
    }
    for path in cmd::run::DEFAULT_CONFIG_PATHS {
        let path = Path::new(path);
        if path.exists()
            && let Ok(config) = Config::from_file(path)
        {
            return Some(config);
        }
    }
    None
}

/// Resolve log level: CLI flag > config file > default "info"
fn resolve_log_level(cli_level: Option<&str>, config_path: Option<&Path>) -> String {
    if let Some(level) = cli_level {
        return level.to_string();
    }

    if let Some(config) = peek_config(config_path) {
        return config.log.level.as_str().to_string();
    }

    "info".to_string()
}

/// Resolve the log file destination, `None` when file logging is off
fn resolve_log_file(config_path: Option<&Path>) -> Option<PathBuf> {
    let config = peek_config(config_path).unwrap_or_default();
    (!config.log.file.is_empty()).then(|| config.paths.log_dir.join(&config.log.file))
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter);

    if let Some(path) = log_file {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("could not create log directory {}", dir.display()))?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("could not open log file {}", path.display()))?;
        registry
            .with(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
            .init();
    } else {
        registry.init();
    }

    Ok(())
}
