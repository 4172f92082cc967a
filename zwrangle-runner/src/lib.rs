//! zwrangle runner: pipeline orchestration on top of `zwrangle-core`.
//!
//! This crate provides:
//! - TOML configuration with defaults for every pipeline parameter
//! - Raw row loading with cache-or-acquire resolution
//! - The `prepare` / `wrangle` pipeline
//! - Partition export to CSV or Parquet

pub mod config;
pub mod data_loader;
pub mod export;
pub mod pipeline;

pub use config::{load_credentials, ConfigError, OutlierConfig, WrangleConfig};
pub use data_loader::{load_properties, LoadError, LoadOptions, LoadedData};
pub use export::{export_partitions, ExportFormat};
pub use pipeline::{prepare, wrangle, PrepareReport, PreparedSplits, Shape, WrangleError, Wrangled};
