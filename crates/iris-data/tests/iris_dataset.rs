use iris_data::{Dataset, FEATURE_NAMES, N_FEATURES};
use std::collections::HashSet;

#[test]
fn iris_has_150_balanced_samples() {
    let ds = Dataset::iris().unwrap();
    assert_eq!(ds.len(), 150);
    assert_eq!(ds.n_classes(), 3);
    assert_eq!(ds.class_counts(), vec![50, 50, 50]);
    assert_eq!(FEATURE_NAMES.len(), N_FEATURES);
}

#[test]
fn iris_first_and_last_rows() {
    let ds = Dataset::iris().unwrap();
    assert_eq!(ds.features()[0], [5.1, 3.5, 1.4, 0.2]);
    assert_eq!(ds.targets()[0], 0);
    assert_eq!(ds.features()[100], [6.3, 3.3, 6.0, 2.5]);
    assert_eq!(ds.targets()[100], 2);
    assert_eq!(ds.features()[149], [5.9, 3.0, 5.1, 1.8]);
    assert_eq!(ds.targets()[149], 2);
}

#[test]
fn split_is_80_20_and_disjoint() {
    let ds = Dataset::iris().unwrap();
    let split = ds.train_test_split(0.2, 42).unwrap();

    assert_eq!(split.test.len(), 30);
    assert_eq!(split.train.len(), 120);

    let train: HashSet<_> = split.train_indices.iter().copied().collect();
    let test: HashSet<_> = split.test_indices.iter().copied().collect();
    assert!(train.is_disjoint(&test));
    assert_eq!(train.len() + test.len(), 150);

    for (pos, &row) in split.test_indices.iter().enumerate() {
        assert_eq!(split.test.features()[pos], ds.features()[row]);
        assert_eq!(split.test.targets()[pos], ds.targets()[row]);
    }
}

#[test]
fn split_is_reproducible_per_seed() {
    let ds = Dataset::iris().unwrap();
    let a = ds.train_test_split(0.2, 42).unwrap();
    let b = ds.train_test_split(0.2, 42).unwrap();
    let c = ds.train_test_split(0.2, 7).unwrap();

    assert_eq!(a.test_indices, b.test_indices);
    assert_eq!(a.train, b.train);
    assert_ne!(a.test_indices, c.test_indices);
}

#[test]
fn dataset_serializes_to_json() {
    let ds = Dataset::iris().unwrap().subset(&[0, 50]).unwrap();
    let json = serde_json::to_value(&ds).unwrap();
    assert_eq!(json["targets"], serde_json::json!([0, 1]));
}
