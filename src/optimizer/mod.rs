use crate::error::Result;
use crate::model::SelectorModel;
use ndarray::{Array2, Axis};

/// Gradient L2 norm below which an `(observation, predictor)` pair counts as converged.
pub const CONVERGENCE_THRESHOLD: f64 = 0.025;

/// Outcome of one optimisation step, reported to progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepStats {
    /// Pairs whose projected gradient norm is below [`CONVERGENCE_THRESHOLD`].
    pub converged: usize,
    /// Total number of `(observation, predictor)` pairs.
    pub total: usize,
}

/// Trait for in-place optimisers over a [`SelectorModel`].
///
/// One call to `step` applies exactly one update to the model weights,
/// whatever the gradient magnitude. Convergence is only reported.
pub trait Optimizer<M: SelectorModel> {
    /// Updates `model` from a training batch.
    ///
    /// # Arguments
    /// * `labels`: `[n, num_predictors]`
    /// * `features`: `[n, dim_sample]`
    fn step(
        &self,
        model: &mut M,
        labels: &Array2<f64>,
        features: &Array2<f64>,
    ) -> Result<StepStats>;
}

/// Projected gradient descent.
///
/// Update rule:
/// ```text
/// w ← w - η · Π(∇L(w))
/// ```
/// where the projection `Π` is supplied by the model.
///
/// # Example
/// ```rust
/// use refclass::optimizer::ProjectedGradientDescent;
///
/// let optimizer = ProjectedGradientDescent::new(0.01);
/// assert_eq!(optimizer.learning_rate(), 0.01);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ProjectedGradientDescent {
    lr: f64,
}

impl ProjectedGradientDescent {
    pub fn new(lr: f64) -> Self {
        Self { lr }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr
    }
}

impl<M: SelectorModel> Optimizer<M> for ProjectedGradientDescent {
    fn step(
        &self,
        model: &mut M,
        labels: &Array2<f64>,
        features: &Array2<f64>,
    ) -> Result<StepStats> {
        let proj_grads = model.proj_grad(features.view(), labels.t())?;

        // w += -lr * g
        let delta = proj_grads.mapv(|g| -self.lr * g);
        model.update(&delta)?;

        let norms = proj_grads.map_axis(Axis(2), |g| g.dot(&g).sqrt());
        Ok(StepStats {
            converged: norms.iter().filter(|&&n| n < CONVERGENCE_THRESHOLD).count(),
            total: norms.len(),
        })
    }
}
