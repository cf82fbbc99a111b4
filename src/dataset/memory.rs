use crate::dataset::MultiLabelledDataset;
use crate::error::{Result, SelectionError};
use ndarray::{Array2, Axis};

/// Dataset held entirely in host memory.
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    labels: Array2<f64>,
    features: Array2<f64>,
}

impl InMemoryDataset {
    /// Wraps a label matrix `[N, P]` and a feature matrix `[N, D]`.
    ///
    /// # Errors
    /// [`SelectionError::Dataset`] if the row counts differ or the dataset is empty.
    pub fn new(labels: Array2<f64>, features: Array2<f64>) -> Result<Self> {
        if labels.nrows() != features.nrows() {
            return Err(SelectionError::Dataset(format!(
                "labels and features must have same length ({} vs {})",
                labels.nrows(),
                features.nrows()
            )));
        }
        if features.nrows() == 0 {
            return Err(SelectionError::Dataset("Dataset is empty".into()));
        }
        Ok(Self { labels, features })
    }

    /// Builds a dataset from row vectors.
    pub fn from_rows(labels: Vec<Vec<f64>>, features: Vec<Vec<f64>>) -> Result<Self> {
        let labels = rows_to_array(labels, "labels")?;
        let features = rows_to_array(features, "features")?;
        Self::new(labels, features)
    }

    pub fn labels(&self) -> &Array2<f64> {
        &self.labels
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }
}

fn rows_to_array(rows: Vec<Vec<f64>>, what: &str) -> Result<Array2<f64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
    if !rows.iter().all(|row| row.len() == n_cols) {
        return Err(SelectionError::Dataset(format!(
            "All {} rows must have the same number of columns",
            what
        )));
    }
    let data = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), data)
        .map_err(|e| SelectionError::Dataset(e.to_string()))
}

impl MultiLabelledDataset for InMemoryDataset {
    fn len(&self) -> usize {
        self.features.nrows()
    }

    fn dim_feature(&self) -> usize {
        self.features.ncols()
    }

    fn dim_label(&self) -> usize {
        self.labels.ncols()
    }

    fn get_rows(&self, indices: &[usize]) -> Result<(Array2<f64>, Array2<f64>)> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(SelectionError::Dataset(format!(
                "index {} out of bounds for dataset of {} samples",
                bad,
                self.len()
            )));
        }
        Ok((
            self.labels.select(Axis(0), indices),
            self.features.select(Axis(0), indices),
        ))
    }

    fn all(&self) -> Result<(Array2<f64>, Array2<f64>)> {
        Ok((self.labels.clone(), self.features.clone()))
    }
}
