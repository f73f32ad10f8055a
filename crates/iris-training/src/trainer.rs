//! The one-shot training run.

use crate::config::TrainConfig;
use crate::error::TrainingResult;
use iris_checkpoint::{BincodeCheckpointer, Checkpointer, ModelArtifact};
use iris_data::Dataset;
use iris_forest::{accuracy, RandomForest};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Summary of a completed training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    /// Where the artifact was written.
    pub artifact_path: PathBuf,
    /// Samples used for fitting.
    pub train_samples: usize,
    /// Samples held out from fitting.
    pub test_samples: usize,
    /// Number of trees in the fitted forest.
    pub n_trees: usize,
    /// Accuracy on the held-out samples. Informational only.
    pub held_out_accuracy: f64,
}

/// Runs dataset split, forest fitting and artifact export.
pub struct Trainer<C = BincodeCheckpointer> {
    config: TrainConfig,
    checkpointer: C,
}

impl Trainer<BincodeCheckpointer> {
    /// Create a trainer writing artifacts in the default binary format.
    pub fn new(config: TrainConfig) -> Self {
        Self::with_checkpointer(config, BincodeCheckpointer::new())
    }
}

impl<C: Checkpointer> Trainer<C> {
    /// Create a trainer with a custom artifact writer.
    pub fn with_checkpointer(config: TrainConfig, checkpointer: C) -> Self {
        Self {
            config,
            checkpointer,
        }
    }

    /// The run configuration.
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// The artifact writer.
    pub fn checkpointer(&self) -> &C {
        &self.checkpointer
    }

    /// Train on the built-in iris dataset and write the artifact.
    pub fn run(&self) -> TrainingResult<TrainReport> {
        let dataset = Dataset::iris()?;
        self.run_on(&dataset)
    }

    /// Train on `dataset` and write the artifact, replacing any existing one.
    pub fn run_on(&self, dataset: &Dataset) -> TrainingResult<TrainReport> {
        self.config.validate()?;
        info!(
            samples = dataset.len(),
            test_size = self.config.test_size,
            split_seed = self.config.split_seed,
            "Starting training run"
        );

        let (artifact, report) = self.fit(dataset)?;
        self.checkpointer
            .save(&self.config.output_path, &artifact)?;

        info!(
            path = %report.artifact_path.display(),
            "Model trained and saved"
        );
        Ok(report)
    }

    /// Split and fit without writing anything.
    pub fn fit(&self, dataset: &Dataset) -> TrainingResult<(ModelArtifact, TrainReport)> {
        let split = dataset.train_test_split(self.config.test_size, self.config.split_seed)?;

        let forest = RandomForest::fit(
            &self.config.forest,
            split.train.features(),
            split.train.targets(),
            dataset.n_classes(),
        )?;

        let held_out_accuracy = accuracy(&forest, split.test.features(), split.test.targets())?;
        info!(
            accuracy = held_out_accuracy,
            samples = split.test.len(),
            "Held-out evaluation"
        );

        let report = TrainReport {
            artifact_path: self.config.output_path.clone(),
            train_samples: split.train.len(),
            test_samples: split.test.len(),
            n_trees: forest.n_trees(),
            held_out_accuracy,
        };

        let artifact = ModelArtifact::new(forest)
            .with_metadata("split_seed", self.config.split_seed)
            .with_metadata("forest_seed", self.config.forest.seed)
            .with_metadata("test_size", self.config.test_size)
            .with_metadata("train_samples", report.train_samples)
            .with_metadata("test_samples", report.test_samples)
            .with_metadata("held_out_accuracy", format!("{:.4}", held_out_accuracy));

        Ok((artifact, report))
    }
}
