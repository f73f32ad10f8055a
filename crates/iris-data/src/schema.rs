//! Feature and label schema shared between the trainer and the predictor.
//!
//! The order of [`FEATURE_NAMES`] is the column order of every
//! [`FeatureVector`]. Models are fitted on vectors in this order and the
//! predictor assembles request payloads in the same order.

/// Number of input features.
pub const N_FEATURES: usize = 4;

/// Number of target classes.
pub const N_CLASSES: usize = 3;

/// Feature names in column order.
pub const FEATURE_NAMES: [&str; N_FEATURES] =
    ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// Class names indexed by label.
pub const CLASS_NAMES: [&str; N_CLASSES] = ["setosa", "versicolor", "virginica"];

/// One sample's measurements, in [`FEATURE_NAMES`] order.
pub type FeatureVector = [f64; N_FEATURES];

/// Look up the label index for a class name.
pub fn class_index(name: &str) -> Option<usize> {
    CLASS_NAMES.iter().position(|c| *c == name)
}

/// Check whether a recorded feature list matches [`FEATURE_NAMES`] exactly.
pub fn matches_feature_order<S: AsRef<str>>(names: &[S]) -> bool {
    names.len() == N_FEATURES
        && names
            .iter()
            .zip(FEATURE_NAMES.iter())
            .all(|(a, b)| a.as_ref() == *b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_index() {
        assert_eq!(class_index("setosa"), Some(0));
        assert_eq!(class_index("virginica"), Some(2));
        assert_eq!(class_index("Setosa"), None);
    }

    #[test]
    fn test_matches_feature_order() {
        assert!(matches_feature_order(&FEATURE_NAMES));
        assert!(matches_feature_order(
            &FEATURE_NAMES.map(String::from).to_vec()
        ));

        let swapped = ["sepal_width", "sepal_length", "petal_length", "petal_width"];
        assert!(!matches_feature_order(&swapped));
        assert!(!matches_feature_order(&FEATURE_NAMES[..3]));
    }
}
