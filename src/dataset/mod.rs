//! Multi-labelled dataset abstractions.
//!
//! A multi-labelled dataset pairs every feature row with one label per
//! predictor: the label records whether that predictor errs on the sample.
//!
//! # Core Concepts
//!
//! - **Features**: matrix of shape `(n_samples, dim_feature)`
//! - **Labels**: matrix of shape `(n_samples, dim_label)`, one column per predictor
//! - **Subset**: a borrowed view over a parent dataset restricted to an index list
//!
//! # Example
//!
//! ```rust
//! use refclass::dataset::{InMemoryDataset, MultiLabelledDataset};
//! use ndarray::array;
//!
//! let labels = array![[0.0, 1.0], [1.0, 0.0]];
//! let features = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
//! let dataset = InMemoryDataset::new(labels, features).unwrap();
//!
//! assert_eq!(dataset.len(), 2);
//! assert_eq!(dataset.dim_label(), 2);
//! assert_eq!(dataset.dim_feature(), 3);
//!
//! let (y, x) = dataset.get_rows(&[1]).unwrap();
//! assert_eq!(y.row(0).to_vec(), vec![1.0, 0.0]);
//! assert_eq!(x.row(0).to_vec(), vec![4.0, 5.0, 6.0]);
//! ```

use crate::error::{Result, SelectionError};
use ndarray::Array2;

pub mod memory;
pub mod split;

pub use self::memory::InMemoryDataset;
pub use self::split::{random_split, subset_sizes, Splits};

/// Indexed source of `(labels, features)` pairs.
///
/// Row access returns owned matrices: `labels` is `[k, dim_label]` and
/// `features` is `[k, dim_feature]`, in the order of the requested indices.
pub trait MultiLabelledDataset {
    /// Number of samples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of a feature row.
    fn dim_feature(&self) -> usize;

    /// Number of label columns, i.e. predictors.
    fn dim_label(&self) -> usize;

    /// Gathers the given rows.
    ///
    /// # Errors
    /// [`SelectionError::Dataset`] if any index is out of bounds.
    fn get_rows(&self, indices: &[usize]) -> Result<(Array2<f64>, Array2<f64>)>;

    /// Every row, in index order.
    fn all(&self) -> Result<(Array2<f64>, Array2<f64>)> {
        let indices: Vec<usize> = (0..self.len()).collect();
        self.get_rows(&indices)
    }
}

/// View over a parent dataset restricted to a list of its indices.
///
/// Indexing a subset is relative: row `i` of the subset is row
/// `indices[i]` of the parent.
#[derive(Debug)]
pub struct Subset<'a, D: ?Sized> {
    dataset: &'a D,
    indices: Vec<usize>,
}

impl<'a, D: ?Sized> Clone for Subset<'a, D> {
    fn clone(&self) -> Self {
        Self {
            dataset: self.dataset,
            indices: self.indices.clone(),
        }
    }
}

impl<'a, D: MultiLabelledDataset + ?Sized> Subset<'a, D> {
    pub fn new(dataset: &'a D, indices: Vec<usize>) -> Self {
        Self { dataset, indices }
    }

    /// Parent indices covered by this subset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl<'a, D: MultiLabelledDataset + ?Sized> MultiLabelledDataset for Subset<'a, D> {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn dim_feature(&self) -> usize {
        self.dataset.dim_feature()
    }

    fn dim_label(&self) -> usize {
        self.dataset.dim_label()
    }

    fn get_rows(&self, indices: &[usize]) -> Result<(Array2<f64>, Array2<f64>)> {
        let parent = indices
            .iter()
            .map(|&i| {
                self.indices.get(i).copied().ok_or_else(|| {
                    SelectionError::Dataset(format!(
                        "subset index {} out of bounds for subset of {} samples",
                        i,
                        self.indices.len()
                    ))
                })
            })
            .collect::<Result<Vec<usize>>>()?;
        self.dataset.get_rows(&parent)
    }

    fn all(&self) -> Result<(Array2<f64>, Array2<f64>)> {
        self.dataset.get_rows(&self.indices)
    }
}
