//! Train Command Implementation
//!
//! Fits the random forest on the built-in iris dataset and writes the model
//! artifact the server loads.

use anyhow::{Context, Result};
use clap::Parser;
use iris_forest::ForestParams;
use iris_training::{TrainConfig, TrainReport, Trainer, DEFAULT_MODEL_PATH};
use std::path::PathBuf;
use tracing::info;

/// Train the iris classifier and write the model artifact
///
/// # Example
///
/// ```bash
/// iris-train --output app/model.bin --test-size 0.2 --seed 42
/// ```
#[derive(Parser, Debug, Clone)]
#[command(name = "iris-train", version, about, long_about = None)]
pub struct TrainCommand {
    /// Where to write the model artifact
    #[arg(long, short = 'o', default_value = DEFAULT_MODEL_PATH, env = "IRIS_MODEL_PATH")]
    pub output: PathBuf,

    /// Fraction of samples held out from fitting
    #[arg(long, default_value = "0.2")]
    pub test_size: f64,

    /// Seed for the train/test shuffle
    #[arg(long, short = 's', default_value = "42")]
    pub seed: u64,

    /// Seed for bootstrap sampling and feature selection
    #[arg(long, default_value = "42")]
    pub forest_seed: u64,

    /// Number of trees in the forest
    #[arg(long, short = 'n', default_value = "100")]
    pub n_estimators: usize,
}

impl TrainCommand {
    /// Build the training configuration from the flags.
    pub fn to_config(&self) -> TrainConfig {
        TrainConfig::new(&self.output)
            .with_test_size(self.test_size)
            .with_split_seed(self.seed)
            .with_forest(
                ForestParams::default()
                    .with_n_estimators(self.n_estimators)
                    .with_seed(self.forest_seed),
            )
    }

    /// Execute the train command
    pub fn run(&self) -> Result<TrainReport> {
        info!(
            output = %self.output.display(),
            n_estimators = self.n_estimators,
            "Training iris classifier"
        );

        let report = Trainer::new(self.to_config())
            .run()
            .with_context(|| format!("training run writing {} failed", self.output.display()))?;

        info!(
            train_samples = report.train_samples,
            test_samples = report.test_samples,
            held_out_accuracy = report.held_out_accuracy,
            "Training complete"
        );
        Ok(report)
    }
}
