//! CART decision tree grown with Gini impurity.
//!
//! Nodes live in a flat arena (`Vec<Node>`) with the root at index 0, so a
//! fitted tree serializes as a plain list without recursive boxing.

use crate::classifier::Classifier;
use crate::error::{ForestError, ForestResult};
use crate::params::TreeParams;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// A node in a fitted tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Terminal node holding the class distribution of its training samples.
    Leaf {
        /// Class probabilities, summing to 1.
        distribution: Vec<f64>,
        /// Training samples that reached this leaf.
        n_samples: usize,
    },
    /// Internal node; rows with `x[feature] <= threshold` go left.
    Split {
        /// Feature column tested.
        feature: usize,
        /// Split threshold.
        threshold: f64,
        /// Arena index of the left child.
        left: usize,
        /// Arena index of the right child.
        right: usize,
        /// Training samples that reached this node.
        n_samples: usize,
    },
}

/// A fitted classification tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    n_features: usize,
    n_classes: usize,
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Fit a tree on every row of `features`.
    ///
    /// `seed` drives the per-node feature sampling, which only matters when
    /// `params.max_features` selects fewer than all features.
    pub fn fit<F: AsRef<[f64]>>(
        params: &TreeParams,
        features: &[F],
        targets: &[usize],
        n_classes: usize,
        seed: u64,
    ) -> ForestResult<Self> {
        params.validate()?;
        let n_features = check_inputs(features, targets, n_classes)?;
        let indices: Vec<usize> = (0..features.len()).collect();
        Ok(Self::fit_indices(
            params,
            features,
            targets,
            n_classes,
            n_features,
            indices,
            StdRng::seed_from_u64(seed),
        ))
    }

    /// Fit on the rows named by `indices` (duplicates allowed, as produced by
    /// bootstrap sampling). Inputs must already be validated.
    pub(crate) fn fit_indices<F: AsRef<[f64]>>(
        params: &TreeParams,
        features: &[F],
        targets: &[usize],
        n_classes: usize,
        n_features: usize,
        mut indices: Vec<usize>,
        rng: StdRng,
    ) -> Self {
        let mut builder = TreeBuilder {
            features,
            targets,
            n_classes,
            n_features,
            max_features: params.max_features.resolve(n_features),
            params,
            rng,
            nodes: Vec::new(),
        };
        builder.build(&mut indices, 0);

        Self {
            n_features,
            n_classes,
            nodes: builder.nodes,
        }
    }

    /// Check the arena invariants of a fitted tree.
    ///
    /// Every child index is greater than its parent's and inside the arena,
    /// so prediction always terminates in a leaf. Leaf distributions have one
    /// entry per class and splits test an existing feature.
    pub fn validate(&self) -> ForestResult<()> {
        if self.nodes.is_empty() {
            return Err(ForestError::malformed("tree has no nodes"));
        }
        let len = self.nodes.len();
        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { distribution, .. } => {
                    if distribution.len() != self.n_classes {
                        return Err(ForestError::malformed(format!(
                            "leaf {id} has {} classes, expected {}",
                            distribution.len(),
                            self.n_classes
                        )));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= self.n_features {
                        return Err(ForestError::malformed(format!(
                            "split {id} tests feature {feature} of {}",
                            self.n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ForestError::malformed(format!(
                            "split {id} has a NaN threshold"
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= id || child >= len {
                            return Err(ForestError::malformed(format!(
                                "split {id} points at node {child} of {len}"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Nodes in arena order; index 0 is the root.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Length of the longest root-to-leaf path (a single leaf has depth 0).
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match &nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
            }
        }
        walk(&self.nodes, 0)
    }

    fn leaf_for(&self, x: &[f64]) -> &[f64] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { distribution, .. } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    id = if x[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

impl Classifier for DecisionTree {
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
        Ok(self.leaf_for(x).to_vec())
    }
}

/// Validate a training set, returning its feature width.
pub(crate) fn check_inputs<F: AsRef<[f64]>>(
    features: &[F],
    targets: &[usize],
    n_classes: usize,
) -> ForestResult<usize> {
    if features.len() != targets.len() {
        return Err(ForestError::LengthMismatch {
            features: features.len(),
            targets: targets.len(),
        });
    }
    let first = features.first().ok_or(ForestError::EmptyInput)?;
    let n_features = first.as_ref().len();
    if n_features == 0 {
        return Err(ForestError::DimensionMismatch {
            expected: 1,
            found: 0,
        });
    }
    for row in features {
        if row.as_ref().len() != n_features {
            return Err(ForestError::DimensionMismatch {
                expected: n_features,
                found: row.as_ref().len(),
            });
        }
    }
    if let Some(&label) = targets.iter().find(|&&t| t >= n_classes) {
        return Err(ForestError::InvalidLabel { label, n_classes });
    }
    Ok(n_features)
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

struct TreeBuilder<'a, F> {
    features: &'a [F],
    targets: &'a [usize],
    n_classes: usize,
    n_features: usize,
    max_features: usize,
    params: &'a TreeParams,
    rng: StdRng,
    nodes: Vec<Node>,
}

impl<F: AsRef<[f64]>> TreeBuilder<'_, F> {
    fn value(&self, row: usize, feature: usize) -> f64 {
        self.features[row].as_ref()[feature]
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &i in indices {
            counts[self.targets[i]] += 1;
        }
        counts
    }

    fn push_leaf(&mut self, counts: &[usize], n_samples: usize) -> usize {
        let total = n_samples.max(1) as f64;
        let distribution = counts.iter().map(|&c| c as f64 / total).collect();
        self.nodes.push(Node::Leaf {
            distribution,
            n_samples,
        });
        self.nodes.len() - 1
    }

    fn build(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let n_samples = indices.len();
        let counts = self.class_counts(indices);

        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let depth_reached = self.params.max_depth.is_some_and(|d| depth >= d);
        let too_small = n_samples < self.params.min_samples_split
            || n_samples < 2 * self.params.min_samples_leaf;
        if pure || depth_reached || too_small {
            return self.push_leaf(&counts, n_samples);
        }

        let Some(split) = self.best_split(indices, &counts) else {
            return self.push_leaf(&counts, n_samples);
        };

        let mut mid = 0;
        for i in 0..indices.len() {
            if self.value(indices[i], split.feature) <= split.threshold {
                indices.swap(i, mid);
                mid += 1;
            }
        }

        let id = self.nodes.len();
        self.nodes.push(Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: 0,
            right: 0,
            n_samples,
        });

        let (left_rows, right_rows) = indices.split_at_mut(mid);
        let left_id = self.build(left_rows, depth + 1);
        let right_id = self.build(right_rows, depth + 1);
        if let Node::Split { left, right, .. } = &mut self.nodes[id] {
            *left = left_id;
            *right = right_id;
        }
        id
    }

    /// Lowest weighted-Gini split over a random subset of features.
    ///
    /// At least `max_features` features are examined; if none of them admits
    /// a split, the remaining features are tried in random order.
    fn best_split(&mut self, indices: &[usize], parent_counts: &[usize]) -> Option<SplitCandidate> {
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf;

        let mut feature_order: Vec<usize> = (0..self.n_features).collect();
        feature_order.shuffle(&mut self.rng);

        let mut sorted = indices.to_vec();
        let mut best: Option<SplitCandidate> = None;

        for (visited, &feature) in feature_order.iter().enumerate() {
            if visited >= self.max_features && best.is_some() {
                break;
            }

            sorted.sort_by(|&a, &b| self.value(a, feature).total_cmp(&self.value(b, feature)));

            let mut left_counts = vec![0usize; self.n_classes];
            let mut right_counts = parent_counts.to_vec();
            for pos in 0..n - 1 {
                let label = self.targets[sorted[pos]];
                left_counts[label] += 1;
                right_counts[label] -= 1;

                let current = self.value(sorted[pos], feature);
                let next = self.value(sorted[pos + 1], feature);
                if next <= current {
                    continue;
                }

                let n_left = pos + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let impurity = (n_left as f64 * gini(&left_counts, n_left)
                    + n_right as f64 * gini(&right_counts, n_right))
                    / n as f64;
                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    let mut threshold = current + (next - current) / 2.0;
                    if threshold >= next {
                        threshold = current;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xor_like() -> (Vec<[f64; 2]>, Vec<usize>) {
        let features = vec![
            [0.0, 0.0],
            [0.0, 1.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.1, 0.1],
            [0.1, 0.9],
            [0.9, 0.1],
            [0.9, 0.9],
        ];
        let targets = vec![0, 1, 1, 0, 0, 1, 1, 0];
        (features, targets)
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[4, 0], 4), 0.0);
        assert!((gini(&[2, 2], 4) - 0.5).abs() < 1e-12);
        assert_eq!(gini(&[0, 0], 0), 0.0);
    }

    #[test]
    fn test_fits_training_data_exactly() {
        let (features, targets) = xor_like();
        let tree = DecisionTree::fit(&TreeParams::default(), &features, &targets, 2, 0).unwrap();

        for (x, &y) in features.iter().zip(&targets) {
            assert_eq!(tree.predict(x).unwrap(), y);
        }
        assert_eq!(tree.nodes().len(), 2 * tree.n_leaves() - 1);
    }

    #[test]
    fn test_pure_input_is_single_leaf() {
        let features = vec![[1.0], [2.0], [3.0]];
        let tree =
            DecisionTree::fit(&TreeParams::default(), &features, &[1, 1, 1], 3, 0).unwrap();

        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict_proba(&[10.0]).unwrap(), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let (features, targets) = xor_like();
        let params = TreeParams {
            max_depth: Some(1),
            ..TreeParams::default()
        };
        let tree = DecisionTree::fit(&params, &features, &targets, 2, 0).unwrap();
        assert_eq!(tree.depth(), 1);

        let proba = tree.predict_proba(&[0.0, 0.0]).unwrap();
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_samples_leaf() {
        let features = vec![[1.0], [2.0], [3.0], [4.0]];
        let params = TreeParams {
            min_samples_leaf: 2,
            ..TreeParams::default()
        };
        let tree = DecisionTree::fit(&params, &features, &[0, 1, 1, 1], 2, 0).unwrap();

        for node in tree.nodes() {
            if let Node::Leaf { n_samples, .. } = node {
                assert!(*n_samples >= 2);
            }
        }
    }

    #[test]
    fn test_identical_rows_cannot_split() {
        let features = vec![[1.0, 1.0], [1.0, 1.0]];
        let tree = DecisionTree::fit(&TreeParams::default(), &features, &[0, 1], 2, 0).unwrap();
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict_proba(&[1.0, 1.0]).unwrap(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_input_validation() {
        let features = vec![[1.0, 2.0]];
        let params = TreeParams::default();

        assert_eq!(
            DecisionTree::fit(&params, &features, &[0, 1], 2, 0),
            Err(ForestError::LengthMismatch {
                features: 1,
                targets: 2
            })
        );
        assert_eq!(
            DecisionTree::fit(&params, &features, &[5], 2, 0),
            Err(ForestError::InvalidLabel {
                label: 5,
                n_classes: 2
            })
        );

        let empty: Vec<[f64; 2]> = Vec::new();
        assert_eq!(
            DecisionTree::fit(&params, &empty, &[], 2, 0),
            Err(ForestError::EmptyInput)
        );

        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        assert_eq!(
            DecisionTree::fit(&params, &ragged, &[0, 1], 2, 0),
            Err(ForestError::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_fitted_tree_validates() {
        let (features, targets) = xor_like();
        let tree = DecisionTree::fit(&TreeParams::default(), &features, &targets, 2, 0).unwrap();
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_children() {
        let (features, targets) = xor_like();
        let fitted = DecisionTree::fit(&TreeParams::default(), &features, &targets, 2, 0).unwrap();

        for (left, right) in [(999, 2), (0, 2), (1, 0)] {
            let mut tree = fitted.clone();
            if let Node::Split {
                left: l, right: r, ..
            } = &mut tree.nodes[0]
            {
                *l = left;
                *r = right;
            }
            assert!(matches!(tree.validate(), Err(ForestError::Malformed(_))));
        }
    }

    #[test]
    fn test_validate_rejects_bad_leaves_and_features() {
        let (features, targets) = xor_like();
        let fitted = DecisionTree::fit(&TreeParams::default(), &features, &targets, 2, 0).unwrap();

        let mut tree = fitted.clone();
        let leaf = tree
            .nodes
            .iter_mut()
            .find(|n| matches!(n, Node::Leaf { .. }))
            .unwrap();
        if let Node::Leaf { distribution, .. } = leaf {
            distribution.push(0.0);
        }
        assert!(matches!(tree.validate(), Err(ForestError::Malformed(_))));

        let mut tree = fitted.clone();
        if let Node::Split { feature, .. } = &mut tree.nodes[0] {
            *feature = 7;
        }
        assert!(matches!(tree.validate(), Err(ForestError::Malformed(_))));

        let mut tree = fitted;
        tree.nodes.clear();
        assert!(matches!(tree.validate(), Err(ForestError::Malformed(_))));
    }

    #[test]
    fn test_predict_dimension_mismatch() {
        let (features, targets) = xor_like();
        let tree = DecisionTree::fit(&TreeParams::default(), &features, &targets, 2, 0).unwrap();
        assert_eq!(
            tree.predict(&[0.0]),
            Err(ForestError::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );
    }
}
