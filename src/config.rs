//! Application Configuration
//! Dataset location, classifier hyperparameters and analysis settings.

use crate::model::{FeatureSubset, ForestParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV_VAR: &str = "DIABETES_PREDICTOR_CONFIG";
/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "diabetes_predictor.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// User-tunable settings. Every field has a default so a partial file works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub n_trees: usize,
    pub seed: u64,
    pub test_fraction: f64,
    pub max_depth: Option<usize>,
    pub feature_subset: FeatureSubset,
    pub histogram_bins: usize,
    pub show_analysis_on_load: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("diabetes.csv"),
            n_trees: 100,
            seed: 42,
            test_fraction: 0.2,
            max_depth: None,
            feature_subset: FeatureSubset::All,
            histogram_bins: 5,
            show_analysis_on_load: true,
        }
    }
}

impl AppConfig {
    /// Load config from `$DIABETES_PREDICTOR_CONFIG` or `diabetes_predictor.json`.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let config = Self::from_file(&path)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_trees == 0 {
            return Err(ConfigError::Invalid("n_trees must be at least 1".into()));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.histogram_bins == 0 {
            return Err(ConfigError::Invalid(
                "histogram_bins must be at least 1".into(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        Ok(())
    }

    /// Forest hyperparameters derived from this config.
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.n_trees,
            seed: self.seed,
            max_depth: self.max_depth,
            feature_subset: self.feature_subset,
            ..ForestParams::default()
        }
    }
}
