//! Error types for reference-class selection.

use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Error type for configuration, dataset access and tensor shape failures.
///
/// Configuration errors are raised at construction, before any data is split
/// or any optimisation runs. Shape errors surface from the linear model and
/// are never retried.
#[derive(Debug)]
pub enum SelectionError {
    /// Subset fractions sum to more than 1.
    FractionSumExceeded { sum: f64 },
    /// Subset fraction list has neither 1 nor 2 elements.
    InvalidFractionCount(usize),
    /// A single fraction is not a finite value in (0, 1].
    InvalidFraction(f64),
    /// A split rounds down to zero samples.
    EmptySubset { name: &'static str, dataset_len: usize },
    /// Invalid hyperparameter value.
    InvalidParameter(String),
    /// Tensor dimensions do not line up.
    Shape {
        what: &'static str,
        expected: String,
        got: String,
    },
    /// Dataset construction or row access failed.
    Dataset(String),
    /// Serialization or deserialization error.
    Serialization(String),
    /// I/O error during file operations.
    Io(String),
}

impl SelectionError {
    pub(crate) fn shape(
        what: &'static str,
        expected: impl fmt::Debug,
        got: impl fmt::Debug,
    ) -> Self {
        SelectionError::Shape {
            what,
            expected: format!("{:?}", expected),
            got: format!("{:?}", got),
        }
    }

    /// Whether the error was raised while validating configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SelectionError::FractionSumExceeded { .. }
                | SelectionError::InvalidFractionCount(_)
                | SelectionError::InvalidFraction(_)
                | SelectionError::EmptySubset { .. }
                | SelectionError::InvalidParameter(_)
        )
    }
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::FractionSumExceeded { sum } => {
                write!(f, "sum of fractions of subsets exceeds 1 (got {})", sum)
            }
            SelectionError::InvalidFractionCount(n) => {
                write!(f, "invalid number of subset sizes: expected 1 or 2, got {}", n)
            }
            SelectionError::InvalidFraction(frac) => {
                write!(f, "invalid subset fraction {}: must lie in (0, 1]", frac)
            }
            SelectionError::EmptySubset { name, dataset_len } => {
                write!(
                    f,
                    "{} subset is empty for a dataset of {} samples",
                    name, dataset_len
                )
            }
            SelectionError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            SelectionError::Shape {
                what,
                expected,
                got,
            } => write!(f, "shape mismatch for {}: expected {}, got {}", what, expected, got),
            SelectionError::Dataset(msg) => write!(f, "Dataset error: {}", msg),
            SelectionError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            SelectionError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for SelectionError {}

impl From<std::io::Error> for SelectionError {
    fn from(err: std::io::Error) -> Self {
        SelectionError::Io(err.to_string())
    }
}

impl From<bincode::Error> for SelectionError {
    fn from(err: bincode::Error) -> Self {
        SelectionError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for SelectionError {
    fn from(err: serde_json::Error) -> Self {
        SelectionError::Serialization(err.to_string())
    }
}
