//! Error types for fitting and evaluating tree models.

use thiserror::Error;

/// Result type alias for tree model operations.
pub type ForestResult<T> = Result<T, ForestError>;

/// Errors that can occur while fitting or querying a tree model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForestError {
    /// Hyperparameters are out of range.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// No samples were supplied.
    #[error("No samples supplied")]
    EmptyInput,

    /// Feature rows and labels differ in count.
    #[error("Got {features} feature rows but {targets} labels")]
    LengthMismatch {
        /// Number of feature rows.
        features: usize,
        /// Number of labels.
        targets: usize,
    },

    /// A feature row has the wrong width.
    #[error("Expected {expected} features, found {found}")]
    DimensionMismatch {
        /// Width the model was fitted with.
        expected: usize,
        /// Width supplied.
        found: usize,
    },

    /// A label falls outside the label space.
    #[error("Label {label} outside label space of {n_classes} classes")]
    InvalidLabel {
        /// Offending label.
        label: usize,
        /// Size of the label space.
        n_classes: usize,
    },

    /// A deserialized model violates the fitted-tree invariants.
    #[error("Malformed model: {0}")]
    Malformed(String),
}

impl ForestError {
    /// Create an invalid parameters error.
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    /// Create a malformed model error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
