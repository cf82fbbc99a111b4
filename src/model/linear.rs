//! Batched sparse linear selectors.
//!
//! A selector `w` accepts sample `x` when `w · x > 0`. For every
//! `(observation, predictor)` pair the model keeps one such weight vector and
//! scores it by the error rate of the predictor on the samples it accepts.
//!
//! Training minimises the surrogate `mean_n y_n · relu(w · x_n)` where `y_n`
//! is the predictor's error indicator. Its gradient is restricted to the
//! support of `w` and projected onto the tangent space of the sphere through
//! `w`, so updates keep the sparsity pattern of the initial observation.
//!
//! - [`LinearModel`]: trainable `[O, P, D]` batch implementing [`SelectorModel`]
//! - [`ReducedSelector`]: `[O, D]` inference model left after reduction

use crate::error::{Result, SelectionError};
use crate::model::{InferenceModel, SelectorModel, WeightShape};
use ndarray::{s, Array1, Array2, Array3, ArrayView2, Axis, Zip};
use serde::{Deserialize, Serialize};

/// Error rate reported for a selector that accepts no sample.
pub const EMPTY_SELECTION_RATE: f64 = 1.0;

/// Trainable batch of linear selectors with weights `[O, P, D]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    weights: Array3<f64>,
}

impl LinearModel {
    /// Wraps a weight tensor.
    ///
    /// # Errors
    /// [`SelectionError::Shape`] if any axis is empty.
    pub fn new(weights: Array3<f64>) -> Result<Self> {
        let (o, p, d) = weights.dim();
        if o == 0 || p == 0 || d == 0 {
            return Err(SelectionError::shape(
                "weights",
                "all axes positive",
                (o, p, d),
            ));
        }
        Ok(Self { weights })
    }

    /// Starts training from a batch of observations `[O, P, D]`.
    pub fn from_observations(observations: Array3<f64>) -> Result<Self> {
        Self::new(observations)
    }

    /// Selector scores `w · x` laid out as `[O * P, n]`.
    fn scores(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let (o, p, d) = self.weights.dim();
        let flat = self
            .weights
            .to_shape((o * p, d))
            .map_err(|e| SelectionError::shape("weights", (o * p, d), e.to_string()))?;
        Ok(flat.dot(&x.t()))
    }

    fn check_batch(&self, x: &ArrayView2<'_, f64>, y: &ArrayView2<'_, f64>) -> Result<()> {
        let (_, p, d) = self.weights.dim();
        if x.ncols() != d {
            return Err(SelectionError::shape("features", (x.nrows(), d), x.dim()));
        }
        if y.dim() != (p, x.nrows()) {
            return Err(SelectionError::shape("labels", (p, x.nrows()), y.dim()));
        }
        Ok(())
    }
}

impl SelectorModel for LinearModel {
    fn from_weights(weights: Array3<f64>) -> Result<Self> {
        Self::new(weights)
    }

    fn size(&self) -> WeightShape {
        self.weights.dim()
    }

    fn weights(&self) -> &Array3<f64> {
        &self.weights
    }

    fn proj_grad(&self, x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> Result<Array3<f64>> {
        self.check_batch(&x, &y)?;
        let (o, p, d) = self.weights.dim();
        let n = x.nrows();
        if n == 0 {
            return Ok(Array3::zeros((o, p, d)));
        }

        // Active rows: y[p, n] * 1{w·x_n > 0} / n.
        let mut active = self.scores(x)?;
        let inv_n = 1.0 / n as f64;
        for (row_idx, mut row) in active.rows_mut().into_iter().enumerate() {
            let labels = y.row(row_idx % p);
            Zip::from(&mut row).and(&labels).for_each(|s, &label| {
                *s = if *s > 0.0 { label * inv_n } else { 0.0 };
            });
        }

        let mut grad = active
            .dot(&x)
            .into_shape_with_order((o, p, d))
            .map_err(|e| SelectionError::shape("gradient", (o, p, d), e.to_string()))?;

        Zip::from(grad.lanes_mut(Axis(2)))
            .and(self.weights.lanes(Axis(2)))
            .for_each(|mut g, w| {
                Zip::from(&mut g).and(&w).for_each(|g, &w| {
                    if w == 0.0 {
                        *g = 0.0;
                    }
                });
                let norm_sq = w.dot(&w);
                if norm_sq > 0.0 {
                    let coef = g.dot(&w) / norm_sq;
                    g.scaled_add(-coef, &w);
                }
            });

        Ok(grad)
    }

    fn update(&mut self, delta: &Array3<f64>) -> Result<()> {
        if delta.dim() != self.weights.dim() {
            return Err(SelectionError::shape(
                "update",
                self.weights.dim(),
                delta.dim(),
            ));
        }
        self.weights += delta;
        Ok(())
    }

    fn conditional_one_rate(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
    ) -> Result<Array2<f64>> {
        self.check_batch(&x, &y)?;
        let (o, p, _) = self.weights.dim();
        let scores = self.scores(x)?;

        let mut rates = Array2::from_elem((o, p), EMPTY_SELECTION_RATE);
        for ((oi, pi), rate) in rates.indexed_iter_mut() {
            let (errors, selected) = scores
                .row(oi * p + pi)
                .iter()
                .zip(y.row(pi).iter())
                .filter(|(s, _)| **s > 0.0)
                .fold((0.0, 0usize), |(errors, count), (_, &label)| {
                    (errors + label, count + 1)
                });
            if selected > 0 {
                *rate = errors / selected as f64;
            }
        }
        Ok(rates)
    }

    fn reduce(&self, ids: &Array1<usize>, axis: Axis) -> Result<Array2<f64>> {
        let (o, p, d) = self.weights.dim();
        let (kept, collapsed) = match axis.index() {
            0 => (p, o),
            1 => (o, p),
            other => {
                return Err(SelectionError::shape("reduce axis", "0 or 1", other));
            }
        };
        if ids.len() != kept {
            return Err(SelectionError::shape("reduce ids", kept, ids.len()));
        }
        if let Some(&bad) = ids.iter().find(|&&id| id >= collapsed) {
            return Err(SelectionError::shape(
                "reduce ids",
                format!("indices below {}", collapsed),
                bad,
            ));
        }

        let mut reduced = Array2::zeros((kept, d));
        for (k, (&id, mut row)) in ids.iter().zip(reduced.rows_mut()).enumerate() {
            let source = if axis.index() == 1 {
                self.weights.slice(s![k, id, ..])
            } else {
                self.weights.slice(s![id, k, ..])
            };
            row.assign(&source);
        }
        Ok(reduced)
    }
}

/// One selector per observation, `[O, D]`, produced by reducing a
/// [`LinearModel`] along its predictor axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedSelector {
    weights: Array2<f64>,
}

impl ReducedSelector {
    pub fn new(weights: Array2<f64>) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// `(num_observations, dim_sample)`.
    pub fn size(&self) -> (usize, usize) {
        self.weights.dim()
    }

    /// Raw scores `w · x`, `[O, n]`.
    pub fn scores(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.weights.ncols() {
            return Err(SelectionError::shape(
                "features",
                (x.nrows(), self.weights.ncols()),
                x.dim(),
            ));
        }
        Ok(self.weights.dot(&x.t()))
    }
}

impl InferenceModel for ReducedSelector {
    type InputBatch = Array2<f64>;
    type OutputBatch = Array2<bool>;

    /// Acceptance mask `[O, n]`: `true` where the selector accepts the sample.
    fn predict_batch(&self, input: &Self::InputBatch) -> Result<Self::OutputBatch> {
        Ok(self.scores(input)?.mapv(|s| s > 0.0))
    }
}
