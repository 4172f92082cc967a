//! zwrangle core: domain types, acquisition, caching and cleaning stages.
//!
//! This crate contains the building blocks of the property wrangling pipeline:
//! - Domain types (raw and cleaned rows, categorical codes, partitions)
//! - `PropertySource` trait with MySQL and in-memory implementations
//! - CSV cache with metadata sidecar
//! - IQR outlier removal, type coercion, seeded splitting, mode imputation

pub mod data;
pub mod domain;
pub mod prepare;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: domain and stage types can cross thread boundaries.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::RawProperty>();
        require_sync::<domain::RawProperty>();
        require_send::<domain::Property>();
        require_sync::<domain::Property>();
        require_send::<domain::Partitions<domain::Property>>();
        require_sync::<domain::Partitions<domain::Property>>();

        require_send::<data::CsvCache>();
        require_sync::<data::CsvCache>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();

        require_send::<prepare::ModeImputer>();
        require_sync::<prepare::ModeImputer>();
        require_send::<prepare::SplitConfig>();
        require_sync::<prepare::SplitConfig>();
        require_send::<prepare::PrepareError>();
        require_sync::<prepare::PrepareError>();
    }
}
