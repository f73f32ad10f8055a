//! Error types for the iris-serving crate.
//!
//! Startup failures are fatal to the process; request failures are mapped to
//! HTTP responses through [`IntoResponse`].

use crate::config::ConfigError;
use crate::schema::ValidationErrors;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use iris_checkpoint::CheckpointError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for serving operations.
pub type ServingResult<T> = Result<T, ServingError>;

/// Errors that can occur in the prediction service.
#[derive(Debug, Error)]
pub enum ServingError {
    /// The model artifact could not be read.
    #[error("Failed to load model from {path}: {source}")]
    ModelLoad {
        /// Artifact path.
        path: PathBuf,
        /// Underlying artifact error.
        #[source]
        source: CheckpointError,
    },

    /// The artifact was trained against a different feature schema.
    #[error("Model at {path} is incompatible: trained on features {found:?}")]
    IncompatibleModel {
        /// Artifact path.
        path: PathBuf,
        /// Feature names recorded in the artifact.
        found: Vec<String>,
    },

    /// The request payload failed validation.
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationErrors),

    /// The model rejected a validated input.
    #[error("Prediction failed: {0}")]
    Prediction(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Binding the listener failed.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Server lifecycle error.
    #[error("Server error: {0}")]
    Server(String),
}

impl ServingError {
    /// Create a model load error.
    pub fn model_load(path: impl Into<PathBuf>, source: CheckpointError) -> Self {
        Self::ModelLoad {
            path: path.into(),
            source,
        }
    }

    /// Create a prediction error.
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }

    /// Create a server error.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }

    /// Check if this is a client error (bad request).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<iris_forest::ForestError> for ServingError {
    fn from(err: iris_forest::ForestError) -> Self {
        Self::Prediction(err.to_string())
    }
}

impl IntoResponse for ServingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Validation(errors) => (status, Json(errors)).into_response(),
            other => (status, Json(serde_json::json!({ "detail": other.to_string() })))
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldError;
    use iris_forest::ForestError;

    #[test]
    fn test_error_display() {
        let err = ServingError::model_load(
            "app/model.bin",
            CheckpointError::NotFound(PathBuf::from("app/model.bin")),
        );
        assert_eq!(
            err.to_string(),
            "Failed to load model from app/model.bin: Artifact not found: app/model.bin"
        );

        let err = ServingError::prediction("boom");
        assert_eq!(err.to_string(), "Prediction failed: boom");
    }

    #[test]
    fn test_is_client_error() {
        let err = ServingError::Validation(ValidationErrors::from(vec![FieldError::missing(
            "sepal_length",
            serde_json::json!({}),
        )]));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_is_server_error() {
        assert!(ServingError::prediction("x").is_server_error());
        assert!(ServingError::server("x").is_server_error());
        assert_eq!(
            ServingError::prediction("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_forest_error_conversion() {
        let err: ServingError = ForestError::DimensionMismatch {
            expected: 4,
            found: 3,
        }
        .into();
        assert!(matches!(err, ServingError::Prediction(_)));
    }
}
