//! zwrangle CLI: acquire, prepare and cache management commands.
//!
//! Commands:
//! - `acquire`: fetch single-family properties from MySQL and write the cache
//! - `prepare`: load (cache or MySQL), clean, split, impute, optionally export
//! - `cache status`: report cache presence, size and metadata
//! - `cache clear`: remove the cache file and its metadata sidecar

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zwrangle_core::data::{CsvCache, MySqlSource, PropertySource};
use zwrangle_runner::{
    export_partitions, load_credentials, wrangle, ExportFormat, LoadOptions, WrangleConfig,
};

#[derive(Parser)]
#[command(
    name = "zwrangle",
    about = "zwrangle: acquire, clean and split Zillow single-family property data"
)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch fresh data from the database and overwrite the cache.
    Acquire,
    /// Clean, split and impute the dataset.
    Prepare {
        /// Re-acquire from the database even if the cache exists.
        #[arg(long, default_value_t = false)]
        refresh: bool,

        /// Offline mode: never connect to the database.
        #[arg(long, default_value_t = false, conflicts_with = "refresh")]
        offline: bool,

        /// Write train/validate/test files into this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Output format for --output-dir: csv or parquet.
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report whether the cache exists, its size and metadata.
    Status,
    /// Remove the cache file and metadata sidecar.
    Clear,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = WrangleConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Acquire => run_acquire(&config),
        Commands::Prepare {
            refresh,
            offline,
            output_dir,
            format,
        } => run_prepare(&config, refresh, offline, output_dir, format),
        Commands::Cache { action } => match action {
            CacheAction::Status => run_cache_status(&config),
            CacheAction::Clear => run_cache_clear(&config),
        },
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn mysql_source(config: &WrangleConfig) -> Result<MySqlSource> {
    let credentials = load_credentials().context("database credentials unavailable")?;
    Ok(MySqlSource::new(credentials, &config.database).with_land_use_type(config.land_use_type_id))
}

fn run_acquire(config: &WrangleConfig) -> Result<()> {
    let source = mysql_source(config)?;
    let rows = source.fetch().context("acquisition failed")?;
    let meta = CsvCache::new(&config.cache_path)
        .write(&rows, source.origin())
        .context("failed to write cache")?;

    println!(
        "Cached {} rows to {} (hash {})",
        meta.row_count,
        config.cache_path.display(),
        meta.data_hash.get(..16).unwrap_or(&meta.data_hash)
    );
    Ok(())
}

fn run_prepare(
    config: &WrangleConfig,
    refresh: bool,
    offline: bool,
    output_dir: Option<PathBuf>,
    format: ExportFormat,
) -> Result<()> {
    let cache = CsvCache::new(&config.cache_path);
    let needs_source = !offline && (refresh || !cache.exists());
    let source = if needs_source {
        Some(mysql_source(config)?)
    } else {
        None
    };

    let wrangled = wrangle(
        config,
        source.as_ref().map(|s| s as &dyn PropertySource),
        &LoadOptions { force: refresh },
    )?;
    let report = &wrangled.prepared.report;

    for line in report.shape_lines() {
        println!("{line}");
    }
    println!(
        "rows: {} loaded ({:?}), {} after outlier removal; year_built fill = {}",
        report.input_rows, wrangled.origin, report.rows_after_outliers, report.year_built_fill
    );

    if let Some(dir) = output_dir {
        let paths = export_partitions(&wrangled.prepared.partitions, &dir, format)?;
        for path in paths {
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn run_cache_status(config: &WrangleConfig) -> Result<()> {
    let status = CsvCache::new(&config.cache_path).status();
    println!("Cache: {}", status.path.display());
    if !status.cached {
        println!("  not cached");
        return Ok(());
    }

    if let Some(bytes) = status.size_bytes {
        println!("  size: {:.1} KB", bytes as f64 / 1024.0);
    }
    match status.meta {
        Some(meta) => {
            println!("  rows: {}", meta.row_count);
            println!("  source: {:?}", meta.source);
            println!("  cached at: {}", meta.cached_at);
            println!("  hash: {}", meta.data_hash);
        }
        None => println!("  no metadata sidecar"),
    }
    Ok(())
}

fn run_cache_clear(config: &WrangleConfig) -> Result<()> {
    let cache = CsvCache::new(&config.cache_path);
    if cache.clear()? {
        println!("Removed {}", cache.path().display());
    } else {
        println!("Nothing to remove at {}", cache.path().display());
    }
    Ok(())
}
