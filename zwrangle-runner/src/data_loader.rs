//! Raw row loading with cache-or-acquire resolution.
//!
//! Given a cache and an optional source:
//! 1. If the cache file exists (and `force` is off) → read it
//! 2. Otherwise, if a source is available → fetch, write the cache, return
//! 3. Otherwise → fail with a clear error
//!
//! A present cache file is trusted without any staleness check.

use thiserror::Error;
use tracing::{info, warn};
use zwrangle_core::data::{CsvCache, DataError, DataOrigin, PropertySource};
use zwrangle_core::domain::RawProperty;

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no cached data at '{path}' and no data source configured")]
    NoCachedDataOffline { path: String },

    #[error("acquisition from {source_name} failed: {reason}")]
    AcquireFailed { source_name: String, reason: String },

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Options controlling how rows are loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Re-acquire even if the cache is present.
    pub force: bool,
}

/// Loaded raw rows plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub rows: Vec<RawProperty>,
    pub origin: DataOrigin,
}

/// Load raw property rows from the cache, falling back to the source.
pub fn load_properties(
    cache: &CsvCache,
    source: Option<&dyn PropertySource>,
    opts: &LoadOptions,
) -> Result<LoadedData, LoadError> {
    if !opts.force && cache.exists() {
        let rows = cache.load()?;
        info!(path = %cache.path().display(), rows = rows.len(), "cache hit");
        return Ok(LoadedData {
            rows,
            origin: DataOrigin::Cache,
        });
    }

    let Some(source) = source else {
        return Err(LoadError::NoCachedDataOffline {
            path: cache.path().display().to_string(),
        });
    };

    info!(
        path = %cache.path().display(),
        source = source.name(),
        force = opts.force,
        "cache miss, acquiring"
    );
    let rows = source.fetch().map_err(|e| LoadError::AcquireFailed {
        source_name: source.name().to_string(),
        reason: e.to_string(),
    })?;

    if rows.is_empty() {
        warn!(source = source.name(), "source returned no rows, caching an empty table");
    }
    cache.write(&rows, source.origin())?;

    Ok(LoadedData {
        rows,
        origin: source.origin(),
    })
}
