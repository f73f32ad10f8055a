//! Request handling independent of the transport.

use crate::error::ServingResult;
use crate::model_loader::LoadedModel;
use crate::schema::{IrisInput, PredictResponse, WelcomeResponse};
use iris_forest::Classifier;
use std::sync::Arc;
use tracing::debug;

/// The welcome and predict operations over a shared, read-only model.
///
/// Cloning is cheap: clones share the same model.
#[derive(Clone)]
pub struct PredictorService {
    model: Arc<dyn Classifier>,
}

impl std::fmt::Debug for PredictorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictorService")
            .field("n_features", &self.model.n_features())
            .field("n_classes", &self.model.n_classes())
            .finish()
    }
}

impl PredictorService {
    /// Serve predictions from `model`.
    pub fn new(model: Arc<dyn Classifier>) -> Self {
        Self { model }
    }

    /// Serve predictions from a loaded artifact.
    pub fn from_loaded(model: &LoadedModel) -> Self {
        Self::new(model.classifier())
    }

    /// Static greeting.
    pub fn welcome(&self) -> WelcomeResponse {
        WelcomeResponse::default()
    }

    /// Classify an already validated input.
    pub fn predict(&self, input: &IrisInput) -> ServingResult<PredictResponse> {
        let features = input.features();
        let prediction = self.model.predict(&features)?;
        debug!(?features, prediction, "Prediction");
        Ok(PredictResponse { prediction })
    }

    /// Validate a raw request body, then classify it.
    ///
    /// The model is not consulted when validation fails.
    pub fn predict_body(&self, body: &[u8]) -> ServingResult<PredictResponse> {
        let input = IrisInput::from_body(body)?;
        self.predict(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServingError;
    use iris_forest::ForestResult;

    /// Label 2 when petal width exceeds 1.7, label 0 when below 0.8, else 1.
    struct PetalRule;

    impl Classifier for PetalRule {
        fn n_features(&self) -> usize {
            4
        }

        fn n_classes(&self) -> usize {
            3
        }

        fn predict_proba(&self, x: &[f64]) -> ForestResult<Vec<f64>> {
            let label = if x[3] > 1.7 {
                2
            } else if x[3] < 0.8 {
                0
            } else {
                1
            };
            let mut proba = vec![0.0; 3];
            proba[label] = 1.0;
            Ok(proba)
        }
    }

    fn service() -> PredictorService {
        PredictorService::new(Arc::new(PetalRule))
    }

    #[test]
    fn test_welcome_is_constant() {
        let service = service();
        let first = service.welcome();
        service.predict(&IrisInput::from_features([1.0, 1.0, 1.0, 1.0])).unwrap();
        assert_eq!(service.welcome(), first);
        assert_eq!(first.message, "Welcome to the ML Model API");
    }

    #[test]
    fn test_predict() {
        let service = service();
        let input = IrisInput::from_features([6.3, 3.3, 6.0, 2.5]);
        assert_eq!(service.predict(&input).unwrap().prediction, 2);
    }

    #[test]
    fn test_predict_body_rejects_before_model() {
        let err = service()
            .predict_body(br#"{"sepal_length": 5.1}"#)
            .unwrap_err();
        match err {
            ServingError::Validation(errors) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
    }
}
