//! Most-frequent-value imputation for `year_built`.
//!
//! The imputer is fit on the training partition only and then applied,
//! without refitting, to train, validate and test.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::{Property, YearBuilt};

/// Errors from imputation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImputeError {
    #[error("cannot fit imputer on '{column}': no non-null values among {rows} rows")]
    NoObservedValues { column: &'static str, rows: usize },
}

/// Fitted mode imputer for `year_built`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeImputer {
    fill: YearBuilt,
}

impl ModeImputer {
    /// Fit on `rows`. Ties go to the earliest year.
    pub fn fit(rows: &[Property]) -> Result<Self, ImputeError> {
        let mut counts: HashMap<YearBuilt, usize> = HashMap::new();
        for year in rows.iter().filter_map(|r| r.year_built) {
            *counts.entry(year).or_default() += 1;
        }

        let fill = counts
            .into_iter()
            .max_by(|(ya, ca), (yb, cb)| ca.cmp(cb).then_with(|| yb.cmp(ya)))
            .map(|(year, _)| year)
            .ok_or(ImputeError::NoObservedValues {
                column: "year_built",
                rows: rows.len(),
            })?;

        info!(fill = %fill, "imputer fit on training partition");
        Ok(Self { fill })
    }

    /// The value substituted for missing `year_built`.
    pub fn fill_value(&self) -> YearBuilt {
        self.fill
    }

    /// Fill missing `year_built` in place. Returns how many rows were filled.
    pub fn transform(&self, rows: &mut [Property]) -> usize {
        let mut filled = 0;
        for row in rows.iter_mut().filter(|r| r.year_built.is_none()) {
            row.year_built = Some(self.fill);
            filled += 1;
        }
        filled
    }
}
