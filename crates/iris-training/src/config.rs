//! Training run configuration.

use crate::error::{TrainingError, TrainingResult};
use iris_forest::ForestParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "app/model.bin";

/// Configuration for a [`Trainer`](crate::Trainer) run.
///
/// The defaults reproduce the reference run: 20% held out with split seed 42,
/// a default random forest, artifact written to [`DEFAULT_MODEL_PATH`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Where the artifact is written.
    pub output_path: PathBuf,

    /// Fraction of samples held out from fitting.
    pub test_size: f64,

    /// Seed for the train/test shuffle.
    pub split_seed: u64,

    /// Forest hyperparameters.
    pub forest: ForestParams,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_MODEL_PATH),
            test_size: 0.2,
            split_seed: 42,
            forest: ForestParams::default(),
        }
    }
}

impl TrainConfig {
    /// Create a configuration writing to `output_path`.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            ..Default::default()
        }
    }

    /// Set the held-out fraction.
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Set the split seed.
    pub fn with_split_seed(mut self, seed: u64) -> Self {
        self.split_seed = seed;
        self
    }

    /// Set the forest hyperparameters.
    pub fn with_forest(mut self, forest: ForestParams) -> Self {
        self.forest = forest;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> TrainingResult<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(TrainingError::invalid_config("output path is empty"));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(TrainingError::invalid_config(format!(
                "test size {} must be in (0, 1)",
                self.test_size
            )));
        }
        self.forest.validate()?;
        Ok(())
    }
}
