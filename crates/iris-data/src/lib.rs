//! Reference dataset for the iris classifier.
//!
//! This crate owns the data side of the trainer/predictor contract:
//!
//! - **Schema**: the feature column order ([`FEATURE_NAMES`]) and label space
//!   ([`CLASS_NAMES`]) shared by training and serving
//! - **Dataset**: the embedded 150-sample iris table and a small CSV parser
//! - **Splitting**: seeded, reproducible train/test partitioning
//!
//! # Example
//!
//! ```
//! use iris_data::Dataset;
//!
//! let dataset = Dataset::iris().unwrap();
//! let split = dataset.train_test_split(0.2, 42).unwrap();
//! assert_eq!(split.train.len(), 120);
//! assert_eq!(split.test.len(), 30);
//! ```

pub mod dataset;
pub mod error;
pub mod schema;

pub use dataset::{Dataset, TrainTestSplit};
pub use error::{DataError, DataResult};
pub use schema::{FeatureVector, CLASS_NAMES, FEATURE_NAMES, N_CLASSES, N_FEATURES};
