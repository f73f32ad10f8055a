//! Loading the trained model artifact for serving.
//!
//! The artifact is read exactly once, at startup. Any failure is fatal to the
//! server: there is no retry and no fallback model.

use crate::error::{ServingError, ServingResult};
use iris_checkpoint::{BincodeCheckpointer, CheckpointError, Checkpointer};
use iris_forest::Classifier;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// A model ready for serving.
#[derive(Clone)]
pub struct LoadedModel {
    /// Path the model was loaded from
    pub path: PathBuf,

    /// Class names indexed by label
    pub class_names: Vec<String>,

    /// Unix timestamp of artifact creation
    pub created_at: u64,

    /// Training metadata recorded in the artifact
    pub metadata: BTreeMap<String, String>,

    classifier: Arc<dyn Classifier>,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("path", &self.path)
            .field("class_names", &self.class_names)
            .field("created_at", &self.created_at)
            .field("metadata", &self.metadata)
            .field("n_features", &self.classifier.n_features())
            .finish()
    }
}

impl LoadedModel {
    /// The shared, immutable classifier.
    pub fn classifier(&self) -> Arc<dyn Classifier> {
        Arc::clone(&self.classifier)
    }
}

/// Reads and checks model artifacts.
#[derive(Debug, Clone, Default)]
pub struct ModelLoader<C = BincodeCheckpointer> {
    checkpointer: C,
}

impl ModelLoader<BincodeCheckpointer> {
    /// Create a loader for the default artifact format.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Checkpointer> ModelLoader<C> {
    /// Create a loader reading through a custom checkpointer.
    pub fn with_checkpointer(checkpointer: C) -> Self {
        Self { checkpointer }
    }

    /// Load the artifact at `path`.
    ///
    /// Fails when the file is missing, unreadable, corrupt, of an unknown
    /// format version, holds malformed trees, or was trained against a
    /// different feature order.
    pub fn load(&self, path: &Path) -> ServingResult<LoadedModel> {
        info!(path = %path.display(), "Loading model");

        let artifact = self.checkpointer.restore(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to load model");
            ServingError::model_load(path, e)
        })?;

        artifact.model.validate().map_err(|e| {
            error!(path = %path.display(), error = %e, "Model failed structural check");
            ServingError::model_load(path, CheckpointError::Corrupted(e.to_string()))
        })?;

        if !artifact.is_compatible() {
            error!(
                path = %path.display(),
                features = ?artifact.feature_names,
                "Model feature schema does not match request schema"
            );
            return Err(ServingError::IncompatibleModel {
                path: path.to_path_buf(),
                found: artifact.feature_names,
            });
        }

        info!(
            path = %path.display(),
            n_trees = artifact.model.n_trees(),
            created_at = artifact.created_at,
            "Model loaded"
        );

        Ok(LoadedModel {
            path: path.to_path_buf(),
            class_names: artifact.class_names,
            created_at: artifact.created_at,
            metadata: artifact.metadata,
            classifier: Arc::new(artifact.model),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iris_checkpoint::ModelArtifact;
    use iris_forest::{ForestParams, RandomForest};

    /// Serves a fixed artifact, or fails with `NotFound` when empty.
    struct FixedCheckpointer(Option<ModelArtifact>);

    impl Checkpointer for FixedCheckpointer {
        fn save(&self, _path: &Path, _artifact: &ModelArtifact) -> iris_checkpoint::Result<()> {
            Ok(())
        }

        fn restore(&self, path: &Path) -> iris_checkpoint::Result<ModelArtifact> {
            self.0
                .clone()
                .ok_or_else(|| CheckpointError::NotFound(path.to_path_buf()))
        }
    }

    fn tiny_artifact() -> ModelArtifact {
        let features = vec![[5.1, 3.5, 1.4, 0.2], [7.0, 3.2, 4.7, 1.4], [6.3, 3.3, 6.0, 2.5]];
        let params = ForestParams::default().with_n_estimators(3).with_bootstrap(false);
        ModelArtifact::new(RandomForest::fit(&params, &features, &[0, 1, 2], 3).unwrap())
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        BincodeCheckpointer::new().save(&path, &tiny_artifact()).unwrap();

        let loaded = ModelLoader::new().load(&path).unwrap();
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.class_names, vec!["setosa", "versicolor", "virginica"]);
        assert_eq!(loaded.classifier().predict(&[5.1, 3.5, 1.4, 0.2]).unwrap(), 0);
    }

    #[test]
    fn test_missing_file_is_model_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelLoader::new()
            .load(&dir.path().join("absent.bin"))
            .unwrap_err();
        assert!(matches!(
            err,
            ServingError::ModelLoad {
                source: CheckpointError::NotFound(_),
                ..
            }
        ));
    }

    #[test]
    fn test_reordered_features_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let mut artifact = tiny_artifact();
        artifact.feature_names.swap(0, 1);
        BincodeCheckpointer::new().save(&path, &artifact).unwrap();

        let err = ModelLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, ServingError::IncompatibleModel { .. }));
    }

    #[test]
    fn test_custom_checkpointer() {
        let loader = ModelLoader::with_checkpointer(FixedCheckpointer(Some(tiny_artifact())));
        let loaded = loader.load(Path::new("in-memory")).unwrap();
        assert_eq!(loaded.path, PathBuf::from("in-memory"));
        assert_eq!(loaded.classifier().predict(&[6.3, 3.3, 6.0, 2.5]).unwrap(), 2);

        let err = ModelLoader::with_checkpointer(FixedCheckpointer(None))
            .load(Path::new("in-memory"))
            .unwrap_err();
        assert!(matches!(err, ServingError::ModelLoad { .. }));
    }

    #[test]
    fn test_malformed_trees_rejected_at_load() {
        let mut value = serde_json::to_value(tiny_artifact()).unwrap();
        value["model"]["trees"][0]["nodes"][0]["Split"]["left"] = serde_json::json!(999);
        let tampered: ModelArtifact = serde_json::from_value(value).unwrap();

        let err = ModelLoader::with_checkpointer(FixedCheckpointer(Some(tampered)))
            .load(Path::new("in-memory"))
            .unwrap_err();
        assert!(matches!(
            err,
            ServingError::ModelLoad {
                source: CheckpointError::Corrupted(_),
                ..
            }
        ));
    }
}
