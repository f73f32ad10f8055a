//! The inference interface shared by trees and forests.

use crate::error::{ForestError, ForestResult};

/// A fitted classifier over fixed-width numeric feature rows.
///
/// Implementations are immutable after fitting, so a single instance can be
/// shared across threads and queried concurrently.
pub trait Classifier: Send + Sync {
    /// Width of the feature rows the model was fitted on.
    fn n_features(&self) -> usize;

    /// Size of the label space.
    fn n_classes(&self) -> usize;

    /// Class probability distribution for one feature row.
    fn predict_proba(&self, x: &[f64]) -> ForestResult<Vec<f64>>;

    /// Most probable class label for one feature row.
    fn predict(&self, x: &[f64]) -> ForestResult<usize> {
        let proba = self.predict_proba(x)?;
        Ok(argmax(&proba))
    }
}

/// Index of the largest value; the lowest index wins ties.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Fraction of rows whose predicted label equals the target.
pub fn accuracy<C, F>(model: &C, features: &[F], targets: &[usize]) -> ForestResult<f64>
where
    C: Classifier + ?Sized,
    F: AsRef<[f64]>,
{
    if features.len() != targets.len() {
        return Err(ForestError::LengthMismatch {
            features: features.len(),
            targets: targets.len(),
        });
    }
    if features.is_empty() {
        return Err(ForestError::EmptyInput);
    }

    let mut correct = 0usize;
    for (row, &target) in features.iter().zip(targets) {
        if model.predict(row.as_ref())? == target {
            correct += 1;
        }
    }
    Ok(correct as f64 / targets.len() as f64)
}
