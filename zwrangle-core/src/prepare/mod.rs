//! Cleaning stages: outlier removal, type coercion, splitting, imputation.

pub mod coerce;
pub mod impute;
pub mod outliers;
pub mod split;

use thiserror::Error;

pub use coerce::{coerce_all, coerce_row};
pub use impute::{ImputeError, ModeImputer};
pub use outliers::{iqr_bounds, quantile, remove_outliers, DEFAULT_MULTIPLIER};
pub use split::{split, SplitConfig, SplitError};

/// Errors from the cleaning stages.
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("split error: {0}")]
    Split(#[from] SplitError),

    #[error("impute error: {0}")]
    Impute(#[from] ImputeError),
}
