//! Export of prepared partitions for downstream analysis.
//!
//! Writes `train`, `validate` and `test` into an output directory, either as
//! CSV or as Parquet. In Parquet output `year_built` and `fips` are string
//! columns so the categorical treatment survives the round trip.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use polars::prelude::*;
use zwrangle_core::domain::{Partitions, Property};

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Parquet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "parquet" => Ok(ExportFormat::Parquet),
            other => Err(format!("unknown export format '{other}' (expected csv or parquet)")),
        }
    }
}

/// Write all three partitions to `output_dir`. Returns the written paths in
/// train/validate/test order.
pub fn export_partitions(
    partitions: &Partitions<Property>,
    output_dir: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let named = [
        ("train", &partitions.train),
        ("validate", &partitions.validate),
        ("test", &partitions.test),
    ];

    let mut written = Vec::with_capacity(named.len());
    for (name, rows) in named {
        let path = output_dir.join(format!("{name}.{}", format.extension()));
        match format {
            ExportFormat::Csv => write_csv(rows, &path)?,
            ExportFormat::Parquet => write_parquet(rows, &path)?,
        }
        tracing::debug!(path = %path.display(), rows = rows.len(), "partition written");
        written.push(path);
    }
    Ok(written)
}

/// Render a partition as CSV text with a header row.
///
/// Categorical codes are written through their `Display` form, so whole
/// codes appear as `1970` rather than `1970.0`.
pub fn partition_csv(rows: &[Property]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(Property::COLUMNS)?;
    for row in rows {
        wtr.write_record(csv_record(row))?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn csv_record(row: &Property) -> [String; 6] {
    let number = |v: Option<f64>| v.map(|v| format!("{v:?}")).unwrap_or_default();
    let code = |v: Option<String>| v.unwrap_or_default();
    [
        number(row.bedrooms),
        number(row.bathrooms),
        number(row.square_feet),
        number(row.tax_value),
        code(row.year_built.map(|y| y.to_string())),
        code(row.fips.map(|f| f.to_string())),
    ]
}

fn write_csv(rows: &[Property], path: &Path) -> Result<()> {
    let text = partition_csv(rows)?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

// ── Parquet helpers ─────────────────────────────────────────────────

/// Convert a partition to a Polars DataFrame.
pub fn partition_to_dataframe(rows: &[Property]) -> Result<DataFrame> {
    let bedrooms: Vec<Option<f64>> = rows.iter().map(|r| r.bedrooms).collect();
    let bathrooms: Vec<Option<f64>> = rows.iter().map(|r| r.bathrooms).collect();
    let square_feet: Vec<Option<f64>> = rows.iter().map(|r| r.square_feet).collect();
    let tax_value: Vec<Option<f64>> = rows.iter().map(|r| r.tax_value).collect();
    let years: Vec<Option<String>> = rows
        .iter()
        .map(|r| r.year_built.map(|y| y.to_string()))
        .collect();
    let fips: Vec<Option<String>> = rows.iter().map(|r| r.fips.map(|f| f.to_string())).collect();

    let year_refs: Vec<Option<&str>> = years.iter().map(|s| s.as_deref()).collect();
    let fips_refs: Vec<Option<&str>> = fips.iter().map(|s| s.as_deref()).collect();

    DataFrame::new(vec![
        Column::new("bedrooms".into(), bedrooms),
        Column::new("bathrooms".into(), bathrooms),
        Column::new("square_feet".into(), square_feet),
        Column::new("tax_value".into(), tax_value),
        Column::new("year_built".into(), year_refs),
        Column::new("fips".into(), fips_refs),
    ])
    .context("dataframe creation")
}

fn write_parquet(rows: &[Property], path: &Path) -> Result<()> {
    let mut df = partition_to_dataframe(rows)?;
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .with_context(|| format!("failed to write parquet {}", path.display()))?;
    Ok(())
}
