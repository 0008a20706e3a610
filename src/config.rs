//! Tunable settings, loadable from TOML.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! reference behaviour: a 3-3 sigmoid network trained with learning rate 0.3
//! and momentum 0.1 until loss < 0.005, twenty colors per session, and five
//! saved-model slots under `text-contrast-ml-models`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::activation::activation::ActivationFunction;
use crate::color::generator::DEFAULT_COLOR_COUNT;
use crate::loss::loss_type::LossType;
use crate::train::train_config::TrainConfig;

/// Errors that may occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    pub network: NetworkConfig,
    pub collector: CollectorConfig,
    pub store: StoreConfig,
}

/// Network topology and training hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub hidden_layers: Vec<usize>,
    pub activation: ActivationFunction,
    pub loss: LossType,
    pub learning_rate: f64,
    pub momentum: f64,
    pub error_threshold: f64,
    /// Iterations between progress samples; 0 reports only the final one.
    pub progress_period: usize,
    /// Fixes weight initialisation and shuffling when set.
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            hidden_layers: vec![3, 3],
            activation: ActivationFunction::Sigmoid,
            loss: LossType::Mse,
            learning_rate: 0.3,
            momentum: 0.1,
            error_threshold: 0.005,
            progress_period: 10,
            seed: None,
        }
    }
}

impl NetworkConfig {
    /// Loop configuration for a run of at most `iterations` passes.
    pub fn train_config(&self, iterations: usize) -> TrainConfig {
        TrainConfig {
            iterations,
            error_threshold: self.error_threshold,
            learning_rate: self.learning_rate,
            momentum: self.momentum,
            loss_type: self.loss,
            progress_period: self.progress_period,
            progress_tx: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Colors per session; values below 2 are raised to 2.
    pub color_count: usize,
    /// Soft threshold for `has_enough_examples`.
    pub min_examples: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        CollectorConfig { color_count: DEFAULT_COLOR_COUNT, min_examples: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage slot holding the JSON array of saved models.
    pub key: String,
    /// Maximum number of saved models kept.
    pub capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig { key: "text-contrast-ml-models".to_string(), capacity: 5 }
    }
}

impl ContrastConfig {
    pub fn from_toml_str(text: &str) -> Result<ContrastConfig, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<ContrastConfig, ConfigError> {
        if !path.exists() {
            return Ok(ContrastConfig::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ContrastConfig::from_toml_str(&text)
    }
}
