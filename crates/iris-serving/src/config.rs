//! Server configuration for the prediction service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default artifact location, shared with the trainer.
pub const DEFAULT_MODEL_PATH: &str = "app/model.bin";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Configuration for the HTTP prediction server.
///
/// # Example
///
/// ```
/// use iris_serving::config::ServerConfig;
///
/// let config = ServerConfig::builder()
///     .host("127.0.0.1")
///     .port(9000)
///     .model_path("/models/iris.bin")
///     .build();
/// assert_eq!(config.socket_addr(), "127.0.0.1:9000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to (default: "0.0.0.0")
    pub host: String,

    /// Port to listen on (default: 8000). Port 0 asks the OS for a free port.
    pub port: u16,

    /// Path to the model artifact written by the trainer
    pub model_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

impl ServerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Get the socket address string for binding.
    pub fn socket_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.host.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidHost(self.host.clone()));
        }
        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyModelPath);
        }
        Ok(())
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    model_path: Option<PathBuf>,
}

impl ServerConfigBuilder {
    /// Set the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the port number.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the model path.
    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ServerConfig {
        let default = ServerConfig::default();
        ServerConfig {
            host: self.host.unwrap_or(default.host),
            port: self.port.unwrap_or(default.port),
            model_path: self.model_path.unwrap_or(default.model_path),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Host is blank
    #[error("Invalid host: host cannot be empty")]
    EmptyHost,

    /// Host contains characters that cannot form an address
    #[error("Invalid host: {0:?}")]
    InvalidHost(String),

    /// Model path is blank
    #[error("Invalid model path: path cannot be empty")]
    EmptyModelPath,
}
