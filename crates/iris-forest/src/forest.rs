//! Bootstrap-aggregated ensemble of decision trees.

use crate::classifier::Classifier;
use crate::error::{ForestError, ForestResult};
use crate::params::ForestParams;
use crate::tree::{check_inputs, DecisionTree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// A fitted random forest.
///
/// Prediction averages the leaf distributions of every tree (soft voting) and
/// returns the most probable class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit a forest on `features` / `targets` with labels in `0..n_classes`.
    ///
    /// Trees are grown in parallel. Every tree's seed is drawn from
    /// `params.seed` before any tree is grown, so the fitted forest is the same
    /// for a given seed regardless of thread scheduling.
    pub fn fit<F>(
        params: &ForestParams,
        features: &[F],
        targets: &[usize],
        n_classes: usize,
    ) -> ForestResult<Self>
    where
        F: AsRef<[f64]> + Sync,
    {
        params.validate()?;
        let n_features = check_inputs(features, targets, n_classes)?;
        let n_samples = features.len();
        let tree_params = params.tree_params();

        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let tree_seeds: Vec<u64> = (0..params.n_estimators).map(|_| rng.gen()).collect();

        let trees: Vec<DecisionTree> = tree_seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let indices: Vec<usize> = if params.bootstrap {
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };
                DecisionTree::fit_indices(
                    &tree_params,
                    features,
                    targets,
                    n_classes,
                    n_features,
                    indices,
                    rng,
                )
            })
            .collect();

        let forest = Self {
            params: params.clone(),
            n_features,
            n_classes,
            trees,
        };

        info!(
            trees = forest.trees.len(),
            samples = n_samples,
            features = n_features,
            classes = n_classes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fitted random forest"
        );
        debug!(
            max_depth = forest.trees.iter().map(|t| t.depth()).max().unwrap_or(0),
            "Forest shape"
        );

        Ok(forest)
    }

    /// Parameters the forest was fitted with.
    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// The fitted trees.
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Number of trees.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Check that a forest obtained from outside [`fit`](Self::fit) (for
    /// example by deserialization) is safe to predict with.
    pub fn validate(&self) -> ForestResult<()> {
        if self.n_features == 0 || self.n_classes == 0 {
            return Err(ForestError::malformed(format!(
                "forest declares {} features and {} classes",
                self.n_features, self.n_classes
            )));
        }
        if self.trees.is_empty() {
            return Err(ForestError::malformed("forest has no trees"));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if tree.n_features() != self.n_features || tree.n_classes() != self.n_classes {
                return Err(ForestError::malformed(format!(
                    "tree {i} is {}x{}, forest is {}x{}",
                    tree.n_features(),
                    tree.n_classes(),
                    self.n_features,
                    self.n_classes
                )));
            }
            tree.validate()
                .map_err(|e| ForestError::malformed(format!("tree {i}: {e}")))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, x: &[f64]) -> ForestResult<Vec<f64>> {
        if x.len() != self.n_features {
            return Err(ForestError::DimensionMismatch {
                expected: self.n_features,
                found: x.len(),
            });
        }
        if self.trees.is_empty() {
            return Err(ForestError::EmptyInput);
        }

        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.predict_proba(x)?) {
                *acc += p;
            }
        }
        let n_trees = self.trees.len() as f64;
        for p in &mut proba {
            *p /= n_trees;
        }
        Ok(proba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MaxFeatures;

    fn blobs() -> (Vec<[f64; 2]>, Vec<usize>) {
        let mut features = Vec::new();
        let mut targets = Vec::new();
        for i in 0..20 {
            let jitter = (i % 5) as f64 * 0.05;
            features.push([0.0 + jitter, 0.2 + jitter]);
            targets.push(0);
            features.push([2.0 + jitter, 2.1 - jitter]);
            targets.push(1);
            features.push([0.1 + jitter, 2.0 + jitter]);
            targets.push(2);
        }
        (features, targets)
    }

    #[test]
    fn test_fit_and_predict() {
        let (features, targets) = blobs();
        let params = ForestParams::default().with_n_estimators(25);
        let forest = RandomForest::fit(&params, &features, &targets, 3).unwrap();

        assert_eq!(forest.n_trees(), 25);
        assert_eq!(forest.predict(&[0.05, 0.25]).unwrap(), 0);
        assert_eq!(forest.predict(&[2.1, 2.0]).unwrap(), 1);
        assert_eq!(forest.predict(&[0.1, 2.1]).unwrap(), 2);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (features, targets) = blobs();
        let params = ForestParams::default().with_n_estimators(10);
        let forest = RandomForest::fit(&params, &features, &targets, 3).unwrap();

        let proba = forest.predict_proba(&[1.0, 1.0]).unwrap();
        assert_eq!(proba.len(), 3);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (features, targets) = blobs();
        let params = ForestParams::default().with_n_estimators(8).with_seed(7);
        let a = RandomForest::fit(&params, &features, &targets, 3).unwrap();
        let b = RandomForest::fit(&params, &features, &targets, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_without_bootstrap() {
        let (features, targets) = blobs();
        let params = ForestParams::default()
            .with_n_estimators(4)
            .with_bootstrap(false)
            .with_max_features(MaxFeatures::All);
        let forest = RandomForest::fit(&params, &features, &targets, 3).unwrap();

        for tree in forest.trees() {
            for (x, &y) in features.iter().zip(&targets) {
                assert_eq!(tree.predict(x).unwrap(), y);
            }
        }
    }

    #[test]
    fn test_invalid_params_rejected() {
        let (features, targets) = blobs();
        let params = ForestParams::default().with_n_estimators(0);
        assert!(matches!(
            RandomForest::fit(&params, &features, &targets, 3),
            Err(ForestError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_fitted_forest_validates() {
        let (features, targets) = blobs();
        let params = ForestParams::default().with_n_estimators(5);
        let forest = RandomForest::fit(&params, &features, &targets, 3).unwrap();
        assert_eq!(forest.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_mismatched_trees() {
        let (features, targets) = blobs();
        let params = ForestParams::default().with_n_estimators(3);
        let forest = RandomForest::fit(&params, &features, &targets, 3).unwrap();

        let mut wider = forest.clone();
        wider.n_features = 3;
        assert!(matches!(wider.validate(), Err(ForestError::Malformed(_))));

        let mut empty = forest;
        empty.trees.clear();
        assert!(matches!(empty.validate(), Err(ForestError::Malformed(_))));
    }

    #[test]
    fn test_predict_wrong_width() {
        let (features, targets) = blobs();
        let params = ForestParams::default().with_n_estimators(2);
        let forest = RandomForest::fit(&params, &features, &targets, 3).unwrap();
        assert_eq!(
            forest.predict(&[1.0, 2.0, 3.0]),
            Err(ForestError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        );
    }
}
