//! The persisted form of a trained classifier.

use iris_data::schema::matches_feature_order;
use iris_data::{CLASS_NAMES, FEATURE_NAMES};
use iris_forest::{Classifier, RandomForest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A fitted classifier together with the schema it was trained against.
///
/// `feature_names` records the column order of the training data. A loader
/// compares it with the order it assembles inputs in before serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Fitted ensemble.
    pub model: RandomForest,

    /// Feature names in the column order used for fitting.
    pub feature_names: Vec<String>,

    /// Class names indexed by label.
    pub class_names: Vec<String>,

    /// Unix timestamp (seconds) of artifact creation.
    pub created_at: u64,

    /// Free-form training metadata (seeds, sample counts, scores).
    pub metadata: BTreeMap<String, String>,
}

impl ModelArtifact {
    /// Wrap a forest fitted on the iris schema.
    pub fn new(model: RandomForest) -> Self {
        Self {
            model,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            class_names: CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            metadata: BTreeMap::new(),
        }
    }

    /// Set a metadata value.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl ToString) {
        self.metadata.insert(key.into(), value.to_string());
    }

    /// Builder-style variant of [`set_metadata`](Self::set_metadata).
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set_metadata(key, value);
        self
    }

    /// Whether the recorded feature order matches the serving schema and the
    /// model width agrees with it.
    pub fn is_compatible(&self) -> bool {
        matches_feature_order(&self.feature_names)
            && self.model.n_features() == FEATURE_NAMES.len()
            && self.model.n_classes() == self.class_names.len()
    }
}
