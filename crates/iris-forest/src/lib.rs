//! Random-forest classification.
//!
//! This crate provides a small, dependency-light ensemble classifier:
//!
//! - [`DecisionTree`]: CART tree grown with Gini impurity
//! - [`RandomForest`]: bootstrap-aggregated trees with per-node feature sampling
//! - [`Classifier`]: the inference interface both implement
//!
//! Fitted models derive `serde` traits so they can be persisted as part of a
//! model artifact.
//!
//! # Example
//!
//! ```
//! use iris_forest::{Classifier, ForestParams, RandomForest};
//!
//! let features = vec![
//!     [0.0, 0.0], [0.1, 0.2], [0.2, 0.1], [0.1, 0.0],
//!     [1.0, 1.0], [0.9, 1.1], [1.1, 0.9], [1.0, 1.2],
//! ];
//! let targets = vec![0, 0, 0, 0, 1, 1, 1, 1];
//!
//! let params = ForestParams::default().with_n_estimators(10);
//! let forest = RandomForest::fit(&params, &features, &targets, 2).unwrap();
//! assert_eq!(forest.predict(&[0.95, 1.0]).unwrap(), 1);
//! ```

pub mod classifier;
pub mod error;
pub mod forest;
pub mod params;
pub mod tree;

pub use classifier::{accuracy, argmax, Classifier};
pub use error::{ForestError, ForestResult};
pub use forest::RandomForest;
pub use params::{ForestParams, MaxFeatures, TreeParams};
pub use tree::{DecisionTree, Node};
