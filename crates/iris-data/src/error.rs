//! Error types for dataset loading and splitting.

use thiserror::Error;

/// Result type alias for dataset operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors raised while loading or partitioning a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// The CSV input had no header line.
    #[error("Dataset is empty")]
    Empty,

    /// The CSV header does not list the expected columns.
    #[error("Unexpected header: expected {expected:?}, found {found:?}")]
    BadHeader {
        /// Expected column names.
        expected: Vec<String>,
        /// Column names found in the input.
        found: Vec<String>,
    },

    /// A row has the wrong number of columns.
    #[error("Line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        /// 1-based line number.
        line: usize,
        /// Expected column count.
        expected: usize,
        /// Column count found.
        found: usize,
    },

    /// A feature cell is not a number.
    #[error("Line {line}: invalid value {value:?} for column {column}")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Column name.
        column: String,
        /// Raw cell text.
        value: String,
    },

    /// A species cell names an unknown class.
    #[error("Line {line}: unknown species {species:?}")]
    UnknownClass {
        /// 1-based line number.
        line: usize,
        /// Raw species text.
        species: String,
    },

    /// Split fraction outside `(0, 1)`.
    #[error("Invalid test size {0}: must be in (0, 1)")]
    InvalidTestSize(f64),

    /// Split would leave one side empty.
    #[error("Split of {total} samples with test size {test_size} leaves an empty subset")]
    EmptySplit {
        /// Number of samples being split.
        total: usize,
        /// Requested test fraction.
        test_size: f64,
    },

    /// A subset index is past the end of the dataset.
    #[error("Sample index {index} out of range for dataset of {len}")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Dataset length.
        len: usize,
    },
}
