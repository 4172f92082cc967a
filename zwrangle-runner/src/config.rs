//! Serializable pipeline configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all)
//! yields the standard pipeline: `zillow_df.csv` cache, database `zillow`,
//! land use 261, k = 1.7 over the five numeric columns, 0.2/0.3 split with
//! seed 123. Credentials are never part of this file; see [`load_credentials`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zwrangle_core::data::source::SINGLE_FAMILY_LAND_USE;
use zwrangle_core::data::{DataError, DbCredentials, DEFAULT_CACHE_FILE};
use zwrangle_core::domain::NumericColumn;
use zwrangle_core::prepare::{SplitConfig, SplitError, DEFAULT_MULTIPLIER};

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("outlier multiplier must be finite and non-negative, got {0}")]
    InvalidMultiplier(f64),

    #[error("invalid split: {0}")]
    Split(#[from] SplitError),

    #[error("credentials: {0}")]
    Credentials(#[from] DataError),
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrangleConfig {
    /// Cache file location.
    pub cache_path: PathBuf,
    /// Database holding `properties_2017`.
    pub database: String,
    /// `propertylandusetypeid` to select.
    pub land_use_type_id: i64,
    pub outliers: OutlierConfig,
    pub split: SplitConfig,
}

impl Default for WrangleConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            database: "zillow".to_string(),
            land_use_type_id: SINGLE_FAMILY_LAND_USE,
            outliers: OutlierConfig::default(),
            split: SplitConfig::default(),
        }
    }
}

/// Outlier filter parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    /// IQR multiplier `k`.
    pub multiplier: f64,
    /// Columns filtered, in order.
    pub columns: Vec<NumericColumn>,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_MULTIPLIER,
            columns: NumericColumn::ALL.to_vec(),
        }
    }
}

impl WrangleConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let k = self.outliers.multiplier;
        if !k.is_finite() || k < 0.0 {
            return Err(ConfigError::InvalidMultiplier(k));
        }
        self.split.validate()?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Resolve database credentials from the environment, loading `.env` first
/// if one is present.
pub fn load_credentials() -> Result<DbCredentials, ConfigError> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    Ok(DbCredentials::from_env()?)
}
