//! Seeded train/validate/test splitting.
//!
//! Two successive shuffle splits: first `test_size` of the rows are held out
//! as test, then `validate_size` of the remainder is held out as validate.
//! Held-out counts round up. With the defaults (0.2, 0.3) the partitions are
//! roughly 56% / 24% / 20%.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::Partitions;

/// Split parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of all rows held out for test.
    pub test_size: f64,
    /// Fraction of the non-test rows held out for validate.
    pub validate_size: f64,
    /// Shuffle seed.
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            validate_size: 0.3,
            seed: 123,
        }
    }
}

impl SplitConfig {
    /// Check both fractions lie strictly between 0 and 1.
    pub fn validate(&self) -> Result<(), SplitError> {
        for (name, value) in [("test_size", self.test_size), ("validate_size", self.validate_size)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(SplitError::InvalidFraction { name, value });
            }
        }
        Ok(())
    }
}

/// Errors from splitting.
#[derive(Debug, Error, PartialEq)]
pub enum SplitError {
    #[error("{name} must be strictly between 0 and 1, got {value}")]
    InvalidFraction { name: &'static str, value: f64 },

    #[error("cannot split {rows} rows with {name}={fraction}: a partition would be empty")]
    EmptyPartition {
        rows: usize,
        name: &'static str,
        fraction: f64,
    },
}

/// Shuffle `rows` and hold out `ceil(fraction * n)` of them.
///
/// Returns `(kept, held_out)`.
pub fn shuffle_split<T>(
    mut rows: Vec<T>,
    name: &'static str,
    fraction: f64,
    rng: &mut StdRng,
) -> Result<(Vec<T>, Vec<T>), SplitError> {
    let n = rows.len();
    let n_held = (fraction * n as f64).ceil() as usize;
    if n_held == 0 || n_held >= n {
        return Err(SplitError::EmptyPartition {
            rows: n,
            name,
            fraction,
        });
    }

    rows.shuffle(rng);
    let held_out = rows.split_off(n - n_held);
    Ok((rows, held_out))
}

/// Partition `rows` into train/validate/test.
///
/// Deterministic for a given seed and input order.
pub fn split<T>(rows: Vec<T>, cfg: &SplitConfig) -> Result<Partitions<T>, SplitError> {
    cfg.validate()?;
    let mut rng = StdRng::seed_from_u64(cfg.seed);

    let (train_validate, test) = shuffle_split(rows, "test_size", cfg.test_size, &mut rng)?;
    let (train, validate) =
        shuffle_split(train_validate, "validate_size", cfg.validate_size, &mut rng)?;

    let parts = Partitions {
        train,
        validate,
        test,
    };
    info!(
        train = parts.train.len(),
        validate = parts.validate.len(),
        test = parts.test.len(),
        seed = cfg.seed,
        "split complete"
    );
    Ok(parts)
}
