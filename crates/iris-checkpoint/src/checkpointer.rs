//! Checkpointer trait and the binary artifact file format.

use crate::artifact::ModelArtifact;
use crate::{CheckpointError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Leading bytes of every artifact file.
pub const MAGIC: &[u8; 8] = b"IRISMDL\0";

/// Current artifact format version.
pub const FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = MAGIC.len() + 4;

/// Trait for artifact save and restore.
///
/// # Examples
///
/// ```no_run
/// use iris_checkpoint::{BincodeCheckpointer, Checkpointer, ModelArtifact};
/// use std::path::Path;
///
/// fn reload(path: &Path) -> iris_checkpoint::Result<ModelArtifact> {
///     BincodeCheckpointer::new().restore(path)
/// }
/// ```
pub trait Checkpointer: Send + Sync {
    /// Save an artifact to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or I/O fails.
    fn save(&self, path: &Path, artifact: &ModelArtifact) -> Result<()>;

    /// Restore an artifact from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist, is truncated, carries the
    /// wrong magic or version, or fails to decode.
    fn restore(&self, path: &Path) -> Result<ModelArtifact>;
}

/// Bincode-backed artifact format.
///
/// Files are written to a sibling `*.tmp` path and renamed into place, so a
/// reader never observes a half-written artifact.
#[derive(Debug, Clone, Default)]
pub struct BincodeCheckpointer;

impl BincodeCheckpointer {
    /// Create a new bincode checkpointer.
    pub fn new() -> Self {
        Self
    }

    /// Encode an artifact into header + payload bytes.
    pub fn encode(&self, artifact: &ModelArtifact) -> Result<Vec<u8>> {
        let payload = bincode::serialize(artifact).map_err(CheckpointError::Serialization)?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Decode header + payload bytes into an artifact.
    ///
    /// The fitted trees are checked structurally, so a payload that decodes
    /// but could not be predicted with is reported as corrupted.
    pub fn decode(&self, bytes: &[u8]) -> Result<ModelArtifact> {
        if bytes.len() < HEADER_LEN {
            return Err(CheckpointError::Corrupted(format!(
                "file too short: {} bytes",
                bytes.len()
            )));
        }

        let (magic, rest) = bytes.split_at(MAGIC.len());
        if magic != MAGIC {
            return Err(CheckpointError::Corrupted(
                "missing artifact header".to_string(),
            ));
        }

        let (version, payload) = rest.split_at(4);
        let found = u32::from_le_bytes([version[0], version[1], version[2], version[3]]);
        if found != FORMAT_VERSION {
            return Err(CheckpointError::VersionMismatch {
                expected: FORMAT_VERSION,
                found,
            });
        }

        let artifact: ModelArtifact = bincode::deserialize(payload).map_err(|e| {
            CheckpointError::Corrupted(format!("Bincode deserialization failed: {}", e))
        })?;
        artifact
            .model
            .validate()
            .map_err(|e| CheckpointError::Corrupted(e.to_string()))?;
        Ok(artifact)
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }
}

impl Checkpointer for BincodeCheckpointer {
    fn save(&self, path: &Path, artifact: &ModelArtifact) -> Result<()> {
        info!(path = %path.display(), trees = artifact.model.n_trees(), "Saving model artifact");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CheckpointError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let bytes = self.encode(artifact)?;
        let tmp = Self::temp_path(path);
        std::fs::write(&tmp, &bytes).map_err(|e| CheckpointError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, path).map_err(|e| CheckpointError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!(bytes = bytes.len(), "Model artifact written");
        Ok(())
    }

    fn restore(&self, path: &Path) -> Result<ModelArtifact> {
        info!(path = %path.display(), "Restoring model artifact");

        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CheckpointError::NotFound(path.to_path_buf())
            } else {
                CheckpointError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        self.decode(&bytes)
    }
}
