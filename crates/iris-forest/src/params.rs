//! Hyperparameters for trees and forests.
//!
//! Defaults follow the conventional random-forest configuration: 100 fully
//! grown trees, bootstrap sampling and `sqrt(n_features)` candidate features
//! per split.

use crate::error::{ForestError, ForestResult};
use serde::{Deserialize, Serialize};

/// Number of candidate features examined at each split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// `floor(sqrt(n_features))`, at least 1.
    #[default]
    Sqrt,
    /// `floor(log2(n_features))`, at least 1.
    Log2,
    /// Every feature.
    All,
    /// A fixed count, capped at `n_features`.
    Count(usize),
    /// A fraction of `n_features`, at least 1.
    Fraction(f64),
}

impl MaxFeatures {
    /// Resolve to a concrete count for a given feature width.
    pub fn resolve(&self, n_features: usize) -> usize {
        let n = match *self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Count(k) => k.min(n_features),
            MaxFeatures::Fraction(f) => (f * n_features as f64) as usize,
        };
        n.clamp(1, n_features.max(1))
    }
}

/// Growth limits for a single tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum depth; `None` grows until leaves are pure.
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs to be split.
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split.
    pub min_samples_leaf: usize,
    /// Candidate features per split.
    pub max_features: MaxFeatures,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
        }
    }
}

impl TreeParams {
    /// Validate the growth limits.
    pub fn validate(&self) -> ForestResult<()> {
        if self.max_depth == Some(0) {
            return Err(ForestError::invalid_params("max_depth must be at least 1"));
        }
        if self.min_samples_split < 2 {
            return Err(ForestError::invalid_params(
                "min_samples_split must be at least 2",
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(ForestError::invalid_params(
                "min_samples_leaf must be at least 1",
            ));
        }
        match self.max_features {
            MaxFeatures::Count(0) => Err(ForestError::invalid_params(
                "max_features count must be at least 1",
            )),
            MaxFeatures::Fraction(f) if !(f > 0.0 && f <= 1.0) => Err(
                ForestError::invalid_params("max_features fraction must be in (0, 1]"),
            ),
            _ => Ok(()),
        }
    }
}

/// Configuration for [`RandomForest`](crate::RandomForest) fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees in the ensemble.
    pub n_estimators: usize,
    /// Maximum tree depth; `None` grows until leaves are pure.
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs to be split.
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split.
    pub min_samples_leaf: usize,
    /// Candidate features per split.
    pub max_features: MaxFeatures,
    /// Fit each tree on a bootstrap sample instead of the full set.
    pub bootstrap: bool,
    /// Seed for bootstrap sampling and feature selection.
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestParams {
    /// Set the number of trees.
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    /// Set the maximum tree depth.
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the minimum samples required to split a node.
    pub fn with_min_samples_split(mut self, n: usize) -> Self {
        self.min_samples_split = n;
        self
    }

    /// Set the minimum samples per leaf.
    pub fn with_min_samples_leaf(mut self, n: usize) -> Self {
        self.min_samples_leaf = n;
        self
    }

    /// Set the per-split feature sampling strategy.
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Enable or disable bootstrap sampling.
    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Growth limits applied to every tree in the ensemble.
    pub fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ForestResult<()> {
        if self.n_estimators == 0 {
            return Err(ForestError::invalid_params("n_estimators must be at least 1"));
        }
        self.tree_params().validate()
    }
}
