//! Offline training for the iris classifier.
//!
//! A training run is a single pass with no tuning loop:
//!
//! ```text
//! Dataset::iris() ──► train_test_split(0.2, seed) ──► RandomForest::fit(train)
//!                                                          │
//!                          held-out accuracy (logged) ◄────┤
//!                                                          ▼
//!                                          ModelArtifact ──► app/model.bin
//! ```
//!
//! # Example
//!
//! ```no_run
//! use iris_training::{TrainConfig, Trainer};
//!
//! let report = Trainer::new(TrainConfig::default()).run().unwrap();
//! println!("saved to {}", report.artifact_path.display());
//! ```

pub mod config;
pub mod error;
pub mod trainer;

pub use config::{TrainConfig, DEFAULT_MODEL_PATH};
pub use error::{TrainingError, TrainingResult};
pub use trainer::{TrainReport, Trainer};
