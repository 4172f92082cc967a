//! Domain types: raw and cleaned property rows, categorical codes, numeric columns.
//!
//! `RawProperty` is what acquisition and the cache produce: every field is a
//! nullable number, exactly as stored in `properties_2017`. `Property` is what
//! the cleaning stages produce: `year_built` and `fips` are categorical codes
//! and `taxamount` is gone.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// One acquired (or cached) property row, after the column rename.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProperty {
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub square_feet: Option<f64>,
    pub tax_value: Option<f64>,
    pub year_built: Option<f64>,
    pub taxamount: Option<f64>,
    pub fips: Option<f64>,
}

impl RawProperty {
    /// Column names in file/query order.
    pub const COLUMNS: [&'static str; 7] = [
        "bedrooms",
        "bathrooms",
        "square_feet",
        "tax_value",
        "year_built",
        "taxamount",
        "fips",
    ];
}

/// Categorical code backed by the raw stored number.
///
/// The value is kept exactly as acquired (fractional, negative or out of any
/// integer range alike). Equality, hashing and ordering go through the bit
/// pattern / `total_cmp`, so codes can key maps without arithmetic.
macro_rules! categorical_code {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Wrap a raw value, folding `-0.0` into `0.0`.
            pub fn new(raw: f64) -> Self {
                Self(raw + 0.0)
            }

            pub fn raw(&self) -> f64 {
                self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0.to_bits() == other.0.to_bits()
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.to_bits().hash(state);
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl fmt::Display for $name {
            /// Whole codes print without a decimal point (`1970`, `6037`).
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.0.is_finite() && self.0.fract() == 0.0 && self.0.abs() < 1e15 {
                    write!(f, "{:.0}", self.0)
                } else {
                    write!(f, "{}", self.0)
                }
            }
        }
    };
}

categorical_code!(
    /// Year of construction, treated as a category rather than a quantity.
    YearBuilt
);

categorical_code!(
    /// County FIPS code. Categorical.
    Fips
);

/// One cleaned property row. No `taxamount`.
///
/// Numeric fields stay nullable: only the columns chosen for outlier
/// filtering are guaranteed present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub square_feet: Option<f64>,
    pub tax_value: Option<f64>,
    pub year_built: Option<YearBuilt>,
    pub fips: Option<Fips>,
}

impl Property {
    /// Column names of a cleaned table.
    pub const COLUMNS: [&'static str; 6] = [
        "bedrooms",
        "bathrooms",
        "square_feet",
        "tax_value",
        "year_built",
        "fips",
    ];
}

/// Numeric columns of a raw row that outlier filtering can address by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    Bedrooms,
    Bathrooms,
    SquareFeet,
    TaxValue,
    Taxamount,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 5] = [
        NumericColumn::Bedrooms,
        NumericColumn::Bathrooms,
        NumericColumn::SquareFeet,
        NumericColumn::TaxValue,
        NumericColumn::Taxamount,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NumericColumn::Bedrooms => "bedrooms",
            NumericColumn::Bathrooms => "bathrooms",
            NumericColumn::SquareFeet => "square_feet",
            NumericColumn::TaxValue => "tax_value",
            NumericColumn::Taxamount => "taxamount",
        }
    }

    /// Read this column's value from a raw row.
    pub fn value(&self, row: &RawProperty) -> Option<f64> {
        match self {
            NumericColumn::Bedrooms => row.bedrooms,
            NumericColumn::Bathrooms => row.bathrooms,
            NumericColumn::SquareFeet => row.square_feet,
            NumericColumn::TaxValue => row.tax_value,
            NumericColumn::Taxamount => row.taxamount,
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NumericColumn::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown numeric column '{s}'"))
    }
}

/// Train/validate/test partitions of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Partitions<T> {
    pub train: Vec<T>,
    pub validate: Vec<T>,
    pub test: Vec<T>,
}

impl<T> Partitions<T> {
    /// Total rows across all three partitions.
    pub fn total_rows(&self) -> usize {
        self.train.len() + self.validate.len() + self.test.len()
    }

    /// `(name, rows)` for each partition in train/validate/test order.
    pub fn sizes(&self) -> [(&'static str, usize); 3] {
        [
            ("train", self.train.len()),
            ("validate", self.validate.len()),
            ("test", self.test.len()),
        ]
    }
}
