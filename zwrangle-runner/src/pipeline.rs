//! The wrangling pipeline: wires together loading and the cleaning stages.
//!
//! Two entry points:
//! - `prepare()`: raw rows in, imputed train/validate/test out. No I/O.
//! - `wrangle()`: loads rows (cache or source), then runs `prepare()`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use zwrangle_core::data::{CsvCache, DataOrigin, PropertySource};
use zwrangle_core::domain::{Partitions, Property, RawProperty, YearBuilt};
use zwrangle_core::prepare::{coerce_all, remove_outliers, split, ModeImputer, PrepareError};

use crate::config::WrangleConfig;
use crate::data_loader::{load_properties, LoadError, LoadOptions};

/// Errors from the full pipeline.
#[derive(Debug, Error)]
pub enum WrangleError {
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("prepare error: {0}")]
    Prepare(#[from] PrepareError),
}

/// `(rows, columns)` of one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.rows, self.columns)
    }
}

/// Row accounting for one `prepare()` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareReport {
    pub input_rows: usize,
    pub rows_after_outliers: usize,
    pub train: Shape,
    pub validate: Shape,
    pub test: Shape,
    pub year_built_fill: YearBuilt,
    /// Rows whose `year_built` was imputed, per partition (train, validate, test).
    pub imputed: [usize; 3],
}

impl PrepareReport {
    /// `train -> (r, c)` style lines, one per partition.
    pub fn shape_lines(&self) -> Vec<String> {
        [
            ("train", self.train),
            ("validate", self.validate),
            ("test", self.test),
        ]
        .iter()
        .map(|(name, shape)| format!("{name} -> {shape}"))
        .collect()
    }
}

/// Cleaned, split and imputed data.
#[derive(Debug, Clone)]
pub struct PreparedSplits {
    pub partitions: Partitions<Property>,
    pub imputer: ModeImputer,
    pub report: PrepareReport,
}

/// Result of `wrangle()`.
#[derive(Debug, Clone)]
pub struct Wrangled {
    pub prepared: PreparedSplits,
    pub origin: DataOrigin,
}

fn shape_of(rows: &[Property]) -> Shape {
    Shape {
        rows: rows.len(),
        columns: Property::COLUMNS.len(),
    }
}

/// Remove outliers, coerce types, drop `taxamount`, split, and impute
/// `year_built` from the training partition's mode.
pub fn prepare(raw: Vec<RawProperty>, config: &WrangleConfig) -> Result<PreparedSplits, PrepareError> {
    let input_rows = raw.len();

    let filtered = remove_outliers(raw, config.outliers.multiplier, &config.outliers.columns);
    let rows_after_outliers = filtered.len();
    info!(input_rows, rows_after_outliers, "outliers removed");

    let cleaned = coerce_all(&filtered);
    drop(filtered);

    let mut partitions = split(cleaned, &config.split)?;

    let imputer = ModeImputer::fit(&partitions.train)?;
    let imputed = [
        imputer.transform(&mut partitions.train),
        imputer.transform(&mut partitions.validate),
        imputer.transform(&mut partitions.test),
    ];
    info!(
        fill = %imputer.fill_value(),
        train = imputed[0],
        validate = imputed[1],
        test = imputed[2],
        "year_built imputed"
    );

    let report = PrepareReport {
        input_rows,
        rows_after_outliers,
        train: shape_of(&partitions.train),
        validate: shape_of(&partitions.validate),
        test: shape_of(&partitions.test),
        year_built_fill: imputer.fill_value(),
        imputed,
    };

    Ok(PreparedSplits {
        partitions,
        imputer,
        report,
    })
}

/// Load rows (cache first, then `source`) and prepare them.
pub fn wrangle(
    config: &WrangleConfig,
    source: Option<&dyn PropertySource>,
    opts: &LoadOptions,
) -> Result<Wrangled, WrangleError> {
    let cache = CsvCache::new(&config.cache_path);
    let loaded = load_properties(&cache, source, opts)?;
    let prepared = prepare(loaded.rows, config)?;
    Ok(Wrangled {
        prepared,
        origin: loaded.origin,
    })
}
