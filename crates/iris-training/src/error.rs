//! Error types for training runs.

use iris_checkpoint::CheckpointError;
use iris_data::DataError;
use iris_forest::ForestError;
use thiserror::Error;

/// Result type alias for training operations.
pub type TrainingResult<T> = Result<T, TrainingError>;

/// Errors that abort a training run.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// Training configuration is invalid.
    #[error("Invalid training configuration: {0}")]
    InvalidConfig(String),

    /// Dataset could not be loaded or split.
    #[error("Dataset error: {0}")]
    Data(#[from] DataError),

    /// Model fitting or evaluation failed.
    #[error("Model error: {0}")]
    Model(#[from] ForestError),

    /// Artifact could not be written.
    #[error("Artifact error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

impl TrainingError {
    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
