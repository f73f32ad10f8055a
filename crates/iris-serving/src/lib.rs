//! HTTP prediction service for the iris classifier.
//!
//! This crate provides the serving side of the workspace:
//!
//! - **Model loading**: read the trained artifact once at startup and refuse
//!   to serve an artifact trained against a different feature order
//! - **Validation**: turn raw JSON bodies into typed inputs, reporting every
//!   failing field
//! - **HTTP**: an axum router exposing the welcome and predict endpoints
//! - **Lifecycle**: start, graceful stop and state tracking
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                      Server                          │
//! │  ┌─────────────┐  ┌──────────────────┐  ┌─────────┐  │
//! │  │ ModelLoader │─▶│ PredictorService │─▶│ Router  │  │
//! │  └─────────────┘  └──────────────────┘  └─────────┘  │
//! └──────────────────────────────────────────────────────┘
//!         │                    │
//!         ▼                    ▼
//!   app/model.bin     Arc<dyn Classifier> (read-only)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use iris_serving::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::builder()
//!         .host("127.0.0.1")
//!         .port(8000)
//!         .model_path("app/model.bin")
//!         .build();
//!
//!     let server = Server::new(config);
//!     server
//!         .run_until(async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod model_loader;
pub mod schema;
pub mod server;
pub mod service;

pub use config::{ConfigError, ServerConfig, ServerConfigBuilder, DEFAULT_MODEL_PATH, DEFAULT_PORT};
pub use error::{ServingError, ServingResult};
pub use http::{router, PREDICT_PATH};
pub use model_loader::{LoadedModel, ModelLoader};
pub use schema::{
    FieldError, IrisInput, PredictResponse, ValidationErrors, WelcomeResponse, WELCOME_MESSAGE,
};
pub use server::{Server, ServerState};
pub use service::PredictorService;
