//! Selector models.
//!
//! [`SelectorModel`] is the contract the optimiser relies on: a batch of
//! linear selectors stored as one `[observations, predictors, dim_sample]`
//! weight tensor. How gradients and conditional error rates are computed is
//! left entirely to the implementation.
//!
//! After selection the predictor axis is collapsed and the result is an
//! [`InferenceModel`] that only knows how to apply its decision rule.

pub mod linear;
pub use linear::{LinearModel, ReducedSelector};

use crate::error::Result;
use ndarray::{Array1, Array2, Array3, ArrayView2, Axis};

/// Shape `(num_observations, num_predictors, dim_sample)` of a weight tensor.
pub type WeightShape = (usize, usize, usize);

pub trait SelectorModel {
    /// Rebuilds a model around an existing weight tensor.
    fn from_weights(weights: Array3<f64>) -> Result<Self>
    where
        Self: Sized;

    /// Shape of the weight tensor.
    fn size(&self) -> WeightShape;

    fn weights(&self) -> &Array3<f64>;

    /// Projected gradient of the surrogate loss.
    ///
    /// * `x` - features `[n, dim_sample]`
    /// * `y` - transposed labels `[num_predictors, n]`
    ///
    /// The result has the weight tensor's shape.
    fn proj_grad(&self, x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> Result<Array3<f64>>;

    /// Adds `delta` to the weights in place.
    fn update(&mut self, delta: &Array3<f64>) -> Result<()>;

    /// Per `(observation, predictor)` error rate on the samples each selector accepts.
    ///
    /// Arguments are laid out as in [`proj_grad`](Self::proj_grad); the result is
    /// `[num_observations, num_predictors]` with values in `[0, 1]`.
    fn conditional_one_rate(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
    ) -> Result<Array2<f64>>;

    /// Collapses `axis` by gathering, for every position along the other
    /// leading axis, the weight vector at the given index.
    fn reduce(&self, ids: &Array1<usize>, axis: Axis) -> Result<Array2<f64>>;
}

/// Inference-only model produced once selection is finished.
pub trait InferenceModel {
    type InputBatch;
    type OutputBatch;

    fn predict_batch(&self, input: &Self::InputBatch) -> Result<Self::OutputBatch>;
}
