//! Model artifact persistence for the iris classifier.
//!
//! This crate provides functionality for:
//!
//! - **Artifact**: the fitted forest plus the schema it was trained against
//! - **Save/Restore**: write an artifact to a single file and read it back
//!
//! # Core Components
//!
//! - [`ModelArtifact`]: fitted model, feature names, class names, metadata
//! - [`Checkpointer`]: trait for artifact save/restore implementations
//! - [`BincodeCheckpointer`]: the binary file format used by the trainer and
//!   the predictor
//!
//! # File Layout
//!
//! ```text
//! +----------------+------------------+---------------------------+
//! | magic (8 B)    | version (u32 LE) | bincode(ModelArtifact)    |
//! | "IRISMDL\0"    |                  |                           |
//! +----------------+------------------+---------------------------+
//! ```
//!
//! # Example
//!
//! ```no_run
//! use iris_checkpoint::{BincodeCheckpointer, Checkpointer};
//! use std::path::Path;
//!
//! fn main() -> iris_checkpoint::Result<()> {
//!     let checkpointer = BincodeCheckpointer::new();
//!     let artifact = checkpointer.restore(Path::new("app/model.bin"))?;
//!     println!("trained at {}", artifact.created_at);
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod checkpointer;

pub use artifact::ModelArtifact;
pub use checkpointer::{BincodeCheckpointer, Checkpointer, FORMAT_VERSION, MAGIC};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during artifact operations.
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// I/O error while reading or writing an artifact.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Artifact file not found.
    #[error("Artifact not found: {0}")]
    NotFound(PathBuf),

    /// Error while encoding an artifact.
    #[error("Serialization error: {0}")]
    Serialization(#[source] bincode::Error),

    /// Artifact written by an unsupported format version.
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version.
        expected: u32,
        /// Found version.
        found: u32,
    },

    /// Artifact bytes are not a valid artifact.
    #[error("Corrupted artifact: {0}")]
    Corrupted(String),
}

/// Result type for artifact operations.
pub type Result<T> = std::result::Result<T, CheckpointError>;
