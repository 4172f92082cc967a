//! Data acquisition and caching

pub mod cache;
pub mod source;

pub use cache::{CacheMeta, CacheStatus, CsvCache, DEFAULT_CACHE_FILE};
pub use source::{
    DataError, DataOrigin, DbCredentials, MemorySource, MySqlSource, PropertySource,
};
