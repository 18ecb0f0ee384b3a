//! Run command - execute the aggregation pipeline
//!
//! Loads the raw CSV exports, runs the seven aggregations as blocking
//! tasks over a shared read-only snapshot, then writes one CSV per
//! result table.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use tokio::task;
use tracing::info;

use tally_config::Config;
use tally_export::write_all;
use tally_loader::load_all;
use tally_records::SummaryTable;
use tally_rollup::{DateFilter, attribution, coupon, daily, engagement, funnel, lifetime, product};

/// Default config locations tried when --config is not given
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["configs/tally.toml", "tally.toml"];

/// Run command arguments
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to configuration file (error if specified but not found)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the raw CSV exports. Overrides config file.
    #[arg(long, value_name = "DIR")]
    pub raw_dir: Option<PathBuf>,

    /// Directory receiving the aggregated CSVs. Overrides config file.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Only aggregate days on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<NaiveDate>,

    /// Only aggregate days on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<NaiveDate>,
}

/// Run the aggregation pipeline
pub async fn run(args: RunArgs) -> Result<()> {
    let config_display = args
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(default)".to_string());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_display,
        "tally starting"
    );

    let mut config = load_config(args.config)?;
    if let Some(dir) = args.raw_dir {
        config.paths.raw_data_dir = dir;
    }
    if let Some(dir) = args.out_dir {
        config.paths.aggregated_data_dir = dir;
    }
    if let Some(date) = args.start_date {
        config.run.start_date = Some(date);
    }
    if let Some(date) = args.end_date {
        config.run.end_date = Some(date);
    }
    config.validate().context("invalid configuration")?;

    let dates = config.date_style().context("invalid date format")?;
    let filter = DateFilter::new(config.run.start_date, config.run.end_date);
    if let Some(start) = config.run.start_date {
        info!(%start, "aggregating from");
    }
    if let Some(end) = config.run.end_date {
        info!(%end, "aggregating to");
    }

    let raw_dir = config.paths.raw_data_dir.clone();
    let out_dir = config.paths.aggregated_data_dir.clone();
    fs::create_dir_all(&raw_dir)
        .with_context(|| format!("could not create {}", raw_dir.display()))?;
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("could not create {}", out_dir.display()))?;

    let started = Instant::now();
    let tables = task::spawn_blocking(move || load_all(&raw_dir)).await??;
    let tables = Arc::new(tables);
    let today = Local::now().date_naive();

    let daily_task = task::spawn_blocking({
        let tables = Arc::clone(&tables);
        move || {
            daily::build(
                &tables.orders,
                &tables.sessions,
                tables.users.as_ref(),
                &filter,
            )
        }
    });
    let attribution_task = task::spawn_blocking({
        let tables = Arc::clone(&tables);
        move || attribution::build(&tables.sessions, Some(&tables.orders), &filter)
    });
    let funnel_task = task::spawn_blocking({
        let tables = Arc::clone(&tables);
        move || {
            funnel::build(
                &tables.sessions,
                tables.pageviews.as_ref(),
                tables.cart_adds.as_ref(),
                Some(&tables.orders),
                &filter,
            )
        }
    });
    let product_task = task::spawn_blocking({
        let tables = Arc::clone(&tables);
        move || product::build(tables.order_items.as_ref(), tables.cart_adds.as_ref(), &filter)
    });
    let lifetime_task = task::spawn_blocking({
        let tables = Arc::clone(&tables);
        move || lifetime::build(tables.users.as_ref(), &tables.orders, today)
    });
    let engagement_task = task::spawn_blocking({
        let tables = Arc::clone(&tables);
        move || {
            engagement::build(
                tables.pageviews.as_ref(),
                tables.scrolls.as_ref(),
                tables.clicks.as_ref(),
                &filter,
            )
        }
    });
    let coupon_task = task::spawn_blocking({
        let tables = Arc::clone(&tables);
        move || coupon::build(&tables.orders, &filter)
    });

    let (daily, attribution, funnel, product, lifetime, engagement, coupon) = tokio::try_join!(
        daily_task,
        attribution_task,
        funnel_task,
        product_task,
        lifetime_task,
        engagement_task,
        coupon_task,
    )?;

    info!(out_dir = %out_dir.display(), "writing aggregated tables");
    let summary = task::spawn_blocking(move || {
        let mut outputs: Vec<&dyn SummaryTable> = vec![&daily, &attribution, &funnel];
        if let Some(product) = product.as_ref() {
            outputs.push(product);
        }
        if let Some(lifetime) = lifetime.as_ref() {
            outputs.push(lifetime);
        }
        if let Some(engagement) = engagement.as_ref() {
            outputs.push(engagement);
        }
        if let Some(coupon) = coupon.as_ref() {
            outputs.push(coupon);
        }
        write_all(&out_dir, &outputs, &dates)
    })
    .await?;

    info!(
        files = summary.written,
        rows = summary.rows,
        failed = summary.failed,
        elapsed = %format!("{:.2}s", started.elapsed().as_secs_f64()),
        "pipeline complete"
    );

    if summary.failed > 0 {
        anyhow::bail!("{} output file(s) could not be written", summary.failed);
    }
    Ok(())
}

/// Load configuration: explicit path must exist, otherwise the default
/// locations are tried before falling back to built-in defaults.
fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow::anyhow!(
                    "config file not found: {}",
                    path.display()
                ));
            }
            Config::from_file(&path).context("failed to load configuration")
        }
        None => {
            for candidate in DEFAULT_CONFIG_PATHS {
                let candidate = std::path::Path::new(candidate);
                if candidate.exists() {
                    info!(config = %candidate.display(), "using config file");
                    return Config::from_file(candidate).context("failed to load configuration");
                }
            }
            info!("no config file found, using defaults (raw_data -> aggregated_data)");
            Ok(Config::default())
        }
    }
}
