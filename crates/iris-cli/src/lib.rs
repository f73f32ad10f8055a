//! Iris CLI Library
//!
//! Command-line entry points for the two halves of the system:
//!
//! - **iris-train**: fit the classifier on the built-in dataset and write the
//!   model artifact
//! - **iris-serve**: load the artifact and serve predictions over HTTP
//!
//! Every flag has a default, so both programs run without arguments.
//!
//! # Example
//!
//! ```bash
//! # Train and write app/model.bin
//! iris-train
//!
//! # Serve it on 0.0.0.0:8000
//! iris-serve
//!
//! # Override locations
//! IRIS_MODEL_PATH=/srv/iris.bin iris-train --n-estimators 200
//! iris-serve --model-path /srv/iris.bin --port 9000
//! ```

pub mod commands;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use commands::{ServeCommand, TrainCommand};

/// Install the global tracing subscriber.
///
/// Honours `RUST_LOG`, with `iris=info` added so the workspace crates log at
/// info level by default.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("iris=info".parse()?))
        .try_init()?;
    Ok(())
}
