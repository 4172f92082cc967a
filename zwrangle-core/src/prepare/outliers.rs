//! IQR-based outlier removal.
//!
//! For each column in turn, Q1 and Q3 are computed over the rows that survived
//! the previous columns, and rows outside `[Q1 - k*IQR, Q3 + k*IQR]` are
//! dropped. A row with no value in a filtered column is dropped as well.

use tracing::debug;

use crate::domain::{NumericColumn, RawProperty};

/// Default IQR multiplier.
pub const DEFAULT_MULTIPLIER: f64 = 1.7;

/// Quantile `q` in `[0, 1]` of `sorted` using linear interpolation between
/// the closest ranks (position `(n - 1) * q`). `None` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Retention bounds `(Q1 - k*IQR, Q3 + k*IQR)` for `values`.
///
/// Only finite values take part; NaN and infinities never move the quartiles.
/// `None` when no finite values remain.
pub fn iqr_bounds(values: &[f64], k: f64) -> Option<(f64, f64)> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25)?;
    let q3 = quantile(&sorted, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - k * iqr, q3 + k * iqr))
}

/// Drop rows outside the IQR bounds of each column, cumulatively.
pub fn remove_outliers(
    mut rows: Vec<RawProperty>,
    k: f64,
    columns: &[NumericColumn],
) -> Vec<RawProperty> {
    for column in columns {
        let values: Vec<f64> = rows.iter().filter_map(|r| column.value(r)).collect();

        let Some((lower, upper)) = iqr_bounds(&values, k) else {
            debug!(column = %column, "no values, dropping all rows");
            rows.clear();
            continue;
        };

        let before = rows.len();
        rows.retain(|r| matches!(column.value(r), Some(v) if v >= lower && v <= upper));
        debug!(
            column = %column,
            lower,
            upper,
            dropped = before - rows.len(),
            "outlier filter applied"
        );
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_bedrooms(values: &[f64]) -> Vec<RawProperty> {
        values
            .iter()
            .map(|&b| RawProperty {
                bedrooms: Some(b),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn quantile_interpolates() {
        let sorted = [1.0, 1.0, 2.0, 2.0, 50.0];
        assert_eq!(quantile(&sorted, 0.25), Some(1.0));
        assert_eq!(quantile(&sorted, 0.75), Some(2.0));
        assert_eq!(quantile(&sorted, 0.5), Some(2.0));

        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile(&sorted, 0.75), Some(3.25));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn iqr_bounds_use_multiplier() {
        let (lo, hi) = iqr_bounds(&[1.0, 1.0, 2.0, 2.0, 50.0], 1.7).unwrap();
        assert!((lo - (1.0 - 1.7)).abs() < 1e-12);
        assert!((hi - (2.0 + 1.7)).abs() < 1e-12);
        assert!(iqr_bounds(&[], 1.7).is_none());
        assert!(iqr_bounds(&[f64::NAN], 1.7).is_none());
        assert!(iqr_bounds(&[f64::INFINITY, f64::NEG_INFINITY], 1.7).is_none());
    }

    #[test]
    fn infinite_values_do_not_poison_bounds() {
        let (lo, hi) = iqr_bounds(&[1.0, 2.0, 3.0, 4.0, f64::INFINITY], 1.5).unwrap();
        assert!(lo.is_finite() && hi.is_finite());
        assert!((lo - (1.75 - 1.5 * 1.5)).abs() < 1e-12);
        assert!((hi - (3.25 + 1.5 * 1.5)).abs() < 1e-12);

        let rows = with_bedrooms(&[1.0, 2.0, 3.0, 4.0, f64::INFINITY, f64::NEG_INFINITY]);
        let kept = remove_outliers(rows, 1.5, &[NumericColumn::Bedrooms]);
        let bedrooms: Vec<f64> = kept.iter().filter_map(|r| r.bedrooms).collect();
        assert_eq!(bedrooms, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn extreme_bedroom_count_is_removed() {
        let rows = with_bedrooms(&[1.0, 1.0, 2.0, 2.0, 50.0]);
        let kept = remove_outliers(rows, DEFAULT_MULTIPLIER, &[NumericColumn::Bedrooms]);

        let bedrooms: Vec<f64> = kept.iter().filter_map(|r| r.bedrooms).collect();
        assert_eq!(bedrooms, vec![1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn bounds_are_inclusive() {
        // Q1 = 0, Q3 = 10, IQR = 10; k = 0 keeps exactly [0, 10].
        let rows = with_bedrooms(&[0.0, 0.0, 5.0, 10.0, 10.0]);
        let kept = remove_outliers(rows, 0.0, &[NumericColumn::Bedrooms]);
        assert_eq!(kept.len(), 5);
    }

    #[test]
    fn missing_values_are_dropped() {
        let mut rows = with_bedrooms(&[2.0, 3.0, 3.0, 4.0]);
        rows.push(RawProperty::default());
        let kept = remove_outliers(rows, DEFAULT_MULTIPLIER, &[NumericColumn::Bedrooms]);
        assert_eq!(kept.len(), 4);
        assert!(kept.iter().all(|r| r.bedrooms.is_some()));
    }

    #[test]
    fn filtering_is_cumulative() {
        let mut rows: Vec<RawProperty> = (0..10)
            .map(|i| RawProperty {
                bedrooms: Some(3.0 + (i % 2) as f64),
                bathrooms: Some(2.0 + (i % 3) as f64 * 0.5),
                ..Default::default()
            })
            .collect();
        rows[0].bedrooms = Some(40.0);
        rows[1].bathrooms = Some(30.0);

        let kept = remove_outliers(
            rows,
            DEFAULT_MULTIPLIER,
            &[NumericColumn::Bedrooms, NumericColumn::Bathrooms],
        );
        assert_eq!(kept.len(), 8);
        assert!(kept.iter().all(|r| r.bedrooms != Some(40.0)));
        assert!(kept.iter().all(|r| r.bathrooms != Some(30.0)));
    }

    #[test]
    fn empty_input_and_no_columns() {
        assert!(remove_outliers(vec![], 1.7, &NumericColumn::ALL).is_empty());

        let rows = with_bedrooms(&[1.0, 100.0]);
        assert_eq!(remove_outliers(rows, 1.7, &[]).len(), 2);
    }

    #[test]
    fn all_null_column_removes_every_row() {
        let rows = with_bedrooms(&[1.0, 2.0, 3.0]);
        assert!(remove_outliers(rows, 1.7, &[NumericColumn::TaxValue]).is_empty());
    }
}
