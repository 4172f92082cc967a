//! Type coercion and column drop: raw rows become cleaned `Property` rows.
//!
//! `year_built` and `fips` become categorical codes holding the stored value
//! unchanged, and `taxamount` is discarded. Numeric fields pass through as
//! they are, nulls included: only the columns outlier removal filtered on are
//! guaranteed present.

use crate::domain::{Fips, Property, RawProperty, YearBuilt};

/// Coerce a single raw row. Never fails; nothing is validated.
pub fn coerce_row(raw: &RawProperty) -> Property {
    Property {
        bedrooms: present(raw.bedrooms),
        bathrooms: present(raw.bathrooms),
        square_feet: present(raw.square_feet),
        tax_value: present(raw.tax_value),
        year_built: present(raw.year_built).map(YearBuilt::new),
        fips: present(raw.fips).map(Fips::new),
    }
}

/// Coerce every row, dropping `taxamount`.
pub fn coerce_all(rows: &[RawProperty]) -> Vec<Property> {
    rows.iter().map(coerce_row).collect()
}

impl From<&RawProperty> for Property {
    fn from(raw: &RawProperty) -> Self {
        coerce_row(raw)
    }
}

/// NaN is how some sources spell null.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}
