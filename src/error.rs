use std::path::PathBuf;

use thiserror::Error;

/// A color string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid hex color {0:?}; expected #RGB or #RRGGBB")]
    InvalidHex(String),
}

/// Failures surfaced by the trainer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainerError {
    /// `train` was handed no examples.
    #[error("no training data provided")]
    InvalidInput,
    /// The training computation itself failed; the trainer is now untrained.
    #[error("training failed: {0}")]
    TrainingFailed(String),
    /// A serialized model could not be rebuilt; any held network is untouched.
    #[error("failed to import model: {0}")]
    ImportFailed(String),
    /// A run is already in flight.
    #[error("a training run is already in progress")]
    TrainingInProgress,
}

/// Errors from the raw key-value medium.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no data directory available for saved models")]
    NoDataDir,
    #[error("storage quota exceeded: {needed} bytes needed, {capacity} available")]
    QuotaExceeded { needed: usize, capacity: usize },
}

/// Errors from the saved-model collection.
#[derive(Debug, Error)]
pub enum ModelStoreError {
    /// The write failed even after evicting one more model.
    #[error("failed to persist saved models: {0}")]
    PersistenceFailed(#[source] StoreError),
    #[error("failed to serialize saved models: {0}")]
    Serialize(#[from] serde_json::Error),
}
