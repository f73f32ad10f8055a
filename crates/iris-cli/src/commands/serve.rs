//! Serve Command Implementation
//!
//! Loads the model artifact once and serves predictions over HTTP until
//! interrupted.

use anyhow::{Context, Result};
use clap::Parser;
use iris_serving::{Server, ServerConfig, DEFAULT_MODEL_PATH, DEFAULT_PORT};
use std::future::Future;
use std::path::PathBuf;
use tracing::{info, warn};

/// Serve iris predictions over HTTP
///
/// # Example
///
/// ```bash
/// iris-serve --model-path app/model.bin --host 0.0.0.0 --port 8000
/// ```
#[derive(Parser, Debug, Clone)]
#[command(name = "iris-serve", version, about, long_about = None)]
pub struct ServeCommand {
    /// Model artifact written by iris-train
    #[arg(long, short = 'm', default_value = DEFAULT_MODEL_PATH, env = "IRIS_MODEL_PATH")]
    pub model_path: PathBuf,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0", env = "IRIS_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short = 'p', default_value_t = DEFAULT_PORT, env = "IRIS_PORT")]
    pub port: u16,
}

impl ServeCommand {
    /// Build the server configuration from the flags.
    pub fn to_config(&self) -> ServerConfig {
        ServerConfig::builder()
            .host(self.host.clone())
            .port(self.port)
            .model_path(self.model_path.clone())
            .build()
    }

    /// Execute the serve command, stopping on Ctrl-C.
    pub async fn run(&self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Execute the serve command, stopping when `signal` resolves.
    pub async fn run_until<F>(&self, signal: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let server = Server::new(self.to_config());
        server
            .run_until(signal)
            .await
            .with_context(|| format!("serving {} failed", self.model_path.display()))
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
    }
}
