//! Local CSV cache for acquired property rows.
//!
//! Layout: a single file (default `zillow_df.csv`) plus a metadata sidecar
//! next to it (`zillow_df.meta.json`).
//!
//! Features:
//! - Atomic writes (write to .tmp, rename into place)
//! - Metadata sidecar (row count, hash, source, timestamp)
//! - Tolerates extra columns on read, such as an unnamed leading index column
//!
//! There is no staleness check: a present cache file is trusted as-is. Callers
//! that want fresh data bypass the cache explicitly.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::source::{DataError, DataOrigin};
use crate::domain::RawProperty;

/// Default cache file name.
pub const DEFAULT_CACHE_FILE: &str = "zillow_df.csv";

/// Metadata sidecar for the cache file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheMeta {
    pub row_count: usize,
    pub data_hash: String,
    pub source: DataOrigin,
    pub cached_at: NaiveDateTime,
}

/// Cache status report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatus {
    pub path: PathBuf,
    pub cached: bool,
    pub size_bytes: Option<u64>,
    pub meta: Option<CacheMeta>,
}

/// The CSV cache.
#[derive(Debug, Clone)]
pub struct CsvCache {
    path: PathBuf,
}

impl CsvCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the cached CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the metadata sidecar.
    pub fn meta_path(&self) -> PathBuf {
        self.path.with_extension("meta.json")
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("csv.tmp")
    }

    /// Whether a cache file is present.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write rows to the cache, replacing any previous contents.
    ///
    /// An empty acquisition is cached too, as a header-only file, so a later
    /// load sees the same zero rows instead of reacquiring.
    pub fn write(&self, rows: &[RawProperty], source: DataOrigin) -> Result<CacheMeta, DataError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| DataError::CacheError(format!("failed to create dir: {e}")))?;
        }

        let tmp_path = self.tmp_path();
        write_csv(rows, &tmp_path)?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::CacheError(format!("atomic rename failed: {e}"))
        })?;

        let meta = CacheMeta {
            row_count: rows.len(),
            data_hash: hash_rows(rows)?,
            source,
            cached_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DataError::CacheError(format!("meta serialization: {e}")))?;
        fs::write(self.meta_path(), meta_json)
            .map_err(|e| DataError::CacheError(format!("meta write: {e}")))?;

        debug!(path = %self.path.display(), rows = rows.len(), "cache written");
        Ok(meta)
    }

    /// Load every cached row in file order.
    pub fn load(&self) -> Result<Vec<RawProperty>, DataError> {
        if !self.exists() {
            return Err(DataError::NoCachedData {
                path: self.path.display().to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let rows = reader
            .deserialize()
            .collect::<Result<Vec<RawProperty>, csv::Error>>()?;

        debug!(path = %self.path.display(), rows = rows.len(), "cache loaded");
        Ok(rows)
    }

    /// Read the metadata sidecar, if present and parseable.
    pub fn get_meta(&self) -> Option<CacheMeta> {
        let content = fs::read_to_string(self.meta_path()).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Report whether the cache is populated, its size and metadata.
    pub fn status(&self) -> CacheStatus {
        let size_bytes = fs::metadata(&self.path).ok().map(|m| m.len());
        CacheStatus {
            path: self.path.clone(),
            cached: size_bytes.is_some(),
            size_bytes,
            meta: self.get_meta(),
        }
    }

    /// Remove the cache file and its sidecar. Returns whether anything was removed.
    pub fn clear(&self) -> Result<bool, DataError> {
        let mut removed = false;
        for path in [self.path.clone(), self.meta_path()] {
            match fs::remove_file(&path) {
                Ok(()) => removed = true,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(DataError::CacheError(format!(
                        "remove {}: {e}",
                        path.display()
                    )))
                }
            }
        }
        Ok(removed)
    }
}

// ── CSV I/O helpers ─────────────────────────────────────────────────

fn write_csv(rows: &[RawProperty], path: &Path) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path)?;
    // serialize() only emits the header alongside the first record.
    if rows.is_empty() {
        writer.write_record(RawProperty::COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .map_err(|e| DataError::CacheError(format!("flush: {e}")))?;
    Ok(())
}

/// BLAKE3 hash over the JSON encoding of the rows.
pub fn hash_rows(rows: &[RawProperty]) -> Result<String, DataError> {
    let bytes = serde_json::to_vec(rows)
        .map_err(|e| DataError::CacheError(format!("hash serialization: {e}")))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_cache_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = env::temp_dir().join(format!("zwrangle_cache_{}_{id}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_rows() -> Vec<RawProperty> {
        vec![
            RawProperty {
                bedrooms: Some(3.0),
                bathrooms: Some(2.0),
                square_feet: Some(1458.0),
                tax_value: Some(136104.0),
                year_built: Some(1970.0),
                taxamount: Some(2319.9),
                fips: Some(6037.0),
            },
            RawProperty {
                bedrooms: Some(4.0),
                bathrooms: Some(2.5),
                square_feet: None,
                tax_value: Some(412_000.25),
                year_built: None,
                taxamount: Some(4935.14),
                fips: Some(6059.0),
            },
        ]
    }

    #[test]
    fn write_and_load_roundtrip() {
        let dir = temp_cache_dir();
        let cache = CsvCache::new(dir.join(DEFAULT_CACHE_FILE));

        cache.write(&sample_rows(), DataOrigin::Memory).unwrap();
        let loaded = cache.load().unwrap();

        assert_eq!(loaded, sample_rows());
        assert!(!dir.join("zillow_df.csv.tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_nonexistent_returns_error() {
        let dir = temp_cache_dir();
        let cache = CsvCache::new(dir.join("missing.csv"));

        assert!(matches!(cache.load(), Err(DataError::NoCachedData { .. })));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_rows_write_header_only_file() {
        let dir = temp_cache_dir();
        let cache = CsvCache::new(dir.join(DEFAULT_CACHE_FILE));

        let meta = cache.write(&[], DataOrigin::MySql).unwrap();
        assert_eq!(meta.row_count, 0);
        assert!(cache.exists());

        let content = fs::read_to_string(cache.path()).unwrap();
        assert_eq!(
            content.trim_end(),
            "bedrooms,bathrooms,square_feet,tax_value,year_built,taxamount,fips"
        );
        assert!(cache.load().unwrap().is_empty());
        assert_eq!(cache.get_meta().unwrap().row_count, 0);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn meta_sidecar_matches_written_rows() {
        let dir = temp_cache_dir();
        let cache = CsvCache::new(dir.join(DEFAULT_CACHE_FILE));

        let written = cache.write(&sample_rows(), DataOrigin::MySql).unwrap();
        let meta = cache.get_meta().unwrap();

        assert_eq!(meta, written);
        assert_eq!(meta.row_count, 2);
        assert_eq!(meta.source, DataOrigin::MySql);
        assert_eq!(meta.data_hash, hash_rows(&cache.load().unwrap()).unwrap());
        assert_eq!(cache.meta_path(), dir.join("zillow_df.meta.json"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn reads_file_with_leading_index_column() {
        let dir = temp_cache_dir();
        let path = dir.join(DEFAULT_CACHE_FILE);
        fs::write(
            &path,
            ",bedrooms,bathrooms,square_feet,tax_value,year_built,taxamount,fips\n\
             0,3.0,2.0,1458.0,136104.0,1970.0,2319.9,6037.0\n\
             1,0.0,0.0,,27516.0,,,6037.0\n",
        )
        .unwrap();

        let rows = CsvCache::new(&path).load().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bedrooms, Some(3.0));
        assert_eq!(rows[0].fips, Some(6037.0));
        assert_eq!(rows[1].square_feet, None);
        assert_eq!(rows[1].year_built, None);
        assert_eq!(rows[1].taxamount, None);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn status_and_clear() {
        let dir = temp_cache_dir();
        let cache = CsvCache::new(dir.join(DEFAULT_CACHE_FILE));

        let status = cache.status();
        assert!(!status.cached);
        assert!(status.meta.is_none());

        cache.write(&sample_rows(), DataOrigin::Memory).unwrap();
        let status = cache.status();
        assert!(status.cached);
        assert!(status.size_bytes.unwrap() > 0);
        assert_eq!(status.meta.unwrap().row_count, 2);

        assert!(cache.clear().unwrap());
        assert!(!cache.exists());
        assert!(cache.get_meta().is_none());
        assert!(!cache.clear().unwrap());

        let _ = fs::remove_dir_all(&dir);
    }
}
