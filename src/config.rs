//! Pipeline configuration.
//!
//! Uses `figment` for layered configuration: built-in defaults -> TOML file ->
//! environment variables prefixed with `PRICEPIPE_` (nested keys separated by
//! `__`, e.g. `PRICEPIPE_MODEL_OPTIONS__TEST_SIZE=0.3`).

use crate::error::Result;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Parameters consumed by the split node (`params:model_options`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Fraction of rows held out for evaluation, in (0, 1).
    pub test_size: f64,
    pub random_state: u64,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: 3,
        }
    }
}

impl ModelOptions {
    pub fn new(test_size: f64, random_state: u64) -> Self {
        Self {
            test_size,
            random_state,
        }
    }
}

/// Column roles that are known up front rather than inferred from dtypes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub label: String,
    /// Columns pruned before scaling and encoding.
    pub drop_columns: Vec<String>,
    /// Min-max scale the label together with the numeric features.
    pub scale_label: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            label: "price".to_string(),
            drop_columns: vec![
                "date".to_string(),
                "sqft_above".to_string(),
                "bathrooms".to_string(),
            ],
            scale_label: true,
        }
    }
}

/// Locations of the datasets the CLI reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub raw_data: PathBuf,
    pub processed_output: Option<PathBuf>,
    pub model_output: Option<PathBuf>,
    pub metrics_output: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            raw_data: PathBuf::from("data/01_raw/houses.csv"),
            processed_output: None,
            model_output: None,
            metrics_output: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub model_options: ModelOptions,
    pub features: FeatureConfig,
    pub catalog: CatalogConfig,
}

impl PipelineConfig {
    /// Load configuration from layered sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (`PRICEPIPE_*`)
    /// 2. The TOML file at `path`, when given and present
    /// 3. Built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(PipelineConfig::default()));

        if let Some(path) = path {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            } else {
                tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            }
        }

        figment = figment.merge(Env::prefixed("PRICEPIPE_").split("__"));

        Ok(figment.extract().map_err(Box::new)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(Figment::from(Serialized::defaults(PipelineConfig::default()))
            .merge(Toml::string(content))
            .extract()
            .map_err(Box::new)?)
    }
}
