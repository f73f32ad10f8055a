//! In-memory labeled dataset and seeded train/test splitting.
//!
//! The reference iris table is compiled into the binary, so obtaining the
//! dataset never touches the filesystem. [`Dataset::from_csv`] accepts the
//! same layout for custom tables.

use crate::error::{DataError, DataResult};
use crate::schema::{class_index, FeatureVector, CLASS_NAMES, FEATURE_NAMES, N_FEATURES};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

const IRIS_CSV: &str = include_str!("../data/iris.csv");

/// Name of the label column in CSV input.
pub const LABEL_COLUMN: &str = "species";

/// A labeled table of feature vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    features: Vec<FeatureVector>,
    targets: Vec<usize>,
}

/// Result of [`Dataset::train_test_split`].
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    /// Samples used for fitting.
    pub train: Dataset,
    /// Held-out samples.
    pub test: Dataset,
    /// Row indices (into the source dataset) of the training samples.
    pub train_indices: Vec<usize>,
    /// Row indices (into the source dataset) of the held-out samples.
    pub test_indices: Vec<usize>,
}

impl Dataset {
    /// Load the built-in iris reference dataset (150 samples, 3 classes).
    pub fn iris() -> DataResult<Self> {
        let dataset = Self::from_csv(IRIS_CSV)?;
        debug!(samples = dataset.len(), "Loaded built-in iris dataset");
        Ok(dataset)
    }

    /// Parse a dataset from CSV text.
    ///
    /// The first line must be the header
    /// `sepal_length,sepal_width,petal_length,petal_width,species`. Blank
    /// lines are skipped.
    pub fn from_csv(text: &str) -> DataResult<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (_, header) = lines.next().ok_or(DataError::Empty)?;
        let expected: Vec<String> = FEATURE_NAMES
            .iter()
            .copied()
            .chain(std::iter::once(LABEL_COLUMN))
            .map(String::from)
            .collect();
        let found: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();
        if found != expected {
            return Err(DataError::BadHeader { expected, found });
        }

        let mut features = Vec::new();
        let mut targets = Vec::new();
        for (line, row) in lines {
            let cells: Vec<&str> = row.split(',').map(str::trim).collect();
            if cells.len() != N_FEATURES + 1 {
                return Err(DataError::ColumnCount {
                    line,
                    expected: N_FEATURES + 1,
                    found: cells.len(),
                });
            }

            let mut sample = [0.0; N_FEATURES];
            for (slot, (cell, column)) in sample
                .iter_mut()
                .zip(cells.iter().zip(FEATURE_NAMES.iter()))
            {
                *slot = cell
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| DataError::InvalidNumber {
                        line,
                        column: column.to_string(),
                        value: cell.to_string(),
                    })?;
            }

            let species = cells[N_FEATURES];
            let label = class_index(species).ok_or_else(|| DataError::UnknownClass {
                line,
                species: species.to_string(),
            })?;

            features.push(sample);
            targets.push(label);
        }

        Ok(Self { features, targets })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature vectors, one per sample.
    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    /// Class labels, one per sample.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Size of the label space.
    pub fn n_classes(&self) -> usize {
        CLASS_NAMES.len()
    }

    /// Number of samples per class label.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes()];
        for &t in &self.targets {
            counts[t] += 1;
        }
        counts
    }

    /// Select rows by index, preserving the order of `indices`.
    pub fn subset(&self, indices: &[usize]) -> DataResult<Self> {
        let len = self.len();
        let mut features = Vec::with_capacity(indices.len());
        let mut targets = Vec::with_capacity(indices.len());
        for &index in indices {
            if index >= len {
                return Err(DataError::IndexOutOfRange { index, len });
            }
            features.push(self.features[index]);
            targets.push(self.targets[index]);
        }
        Ok(Self { features, targets })
    }

    /// Partition into training and held-out subsets.
    ///
    /// All row indices are shuffled with an RNG seeded from `seed`; the first
    /// `ceil(test_size * len)` become the held-out subset and the remainder the
    /// training subset. The same seed always yields the same partition.
    pub fn train_test_split(&self, test_size: f64, seed: u64) -> DataResult<TrainTestSplit> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(DataError::InvalidTestSize(test_size));
        }

        let total = self.len();
        let n_test = (test_size * total as f64).ceil() as usize;
        if n_test == 0 || n_test >= total {
            return Err(DataError::EmptySplit { total, test_size });
        }

        let mut indices: Vec<usize> = (0..total).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let (test_indices, train_indices) = indices.split_at(n_test);
        debug!(
            train = train_indices.len(),
            test = test_indices.len(),
            seed,
            "Split dataset"
        );

        Ok(TrainTestSplit {
            train: self.subset(train_indices)?,
            test: self.subset(test_indices)?,
            train_indices: train_indices.to_vec(),
            test_indices: test_indices.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_CSV: &str = "\
sepal_length,sepal_width,petal_length,petal_width,species
5.1,3.5,1.4,0.2,setosa

7.0,3.2,4.7,1.4,versicolor
6.3,3.3,6.0,2.5,virginica
";

    #[test]
    fn test_from_csv() {
        let ds = Dataset::from_csv(SMALL_CSV).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.targets(), &[0, 1, 2]);
        assert_eq!(ds.features()[2], [6.3, 3.3, 6.0, 2.5]);
    }

    #[test]
    fn test_from_csv_empty() {
        assert!(matches!(Dataset::from_csv("  \n"), Err(DataError::Empty)));
    }

    #[test]
    fn test_from_csv_bad_header() {
        let err = Dataset::from_csv("a,b,c,d,e\n1,2,3,4,setosa").unwrap_err();
        assert!(matches!(err, DataError::BadHeader { .. }));
    }

    #[test]
    fn test_from_csv_reports_line_numbers() {
        let text = "sepal_length,sepal_width,petal_length,petal_width,species\n\
                    5.1,3.5,1.4,0.2,setosa\n\
                    5.1,abc,1.4,0.2,setosa\n";
        match Dataset::from_csv(text).unwrap_err() {
            DataError::InvalidNumber { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "sepal_width");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let text = "sepal_length,sepal_width,petal_length,petal_width,species\n\
                    5.1,3.5,1.4,setosa\n";
        assert!(matches!(
            Dataset::from_csv(text),
            Err(DataError::ColumnCount { line: 2, found: 4, .. })
        ));

        let text = "sepal_length,sepal_width,petal_length,petal_width,species\n\
                    5.1,3.5,1.4,0.2,rose\n";
        assert!(matches!(
            Dataset::from_csv(text),
            Err(DataError::UnknownClass { line: 2, .. })
        ));
    }

    #[test]
    fn test_subset_out_of_range() {
        let ds = Dataset::from_csv(SMALL_CSV).unwrap();
        let sub = ds.subset(&[2, 0]).unwrap();
        assert_eq!(sub.targets(), &[2, 0]);

        assert!(matches!(
            ds.subset(&[3]),
            Err(DataError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_split_rejects_bad_fraction() {
        let ds = Dataset::from_csv(SMALL_CSV).unwrap();
        for size in [0.0, 1.0, -0.1, f64::NAN] {
            assert!(matches!(
                ds.train_test_split(size, 0),
                Err(DataError::InvalidTestSize(_))
            ));
        }
        // ceil(0.9 * 3) == 3 leaves nothing to train on
        assert!(matches!(
            ds.train_test_split(0.9, 0),
            Err(DataError::EmptySplit { total: 3, .. })
        ));
    }
}
