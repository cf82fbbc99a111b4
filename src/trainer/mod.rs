// trainer/mod.rs
use crate::{
    dataset::MultiLabelledDataset,
    error::{Result, SelectionError},
    model::{SelectorModel, WeightShape},
    optimizer::{Optimizer, ProjectedGradientDescent},
    progress::ProgressObserver,
};
use log::debug;
use ndarray::{Array2, Array3, Axis, Zip};

/// Best-so-far weights and validation errors per `(observation, predictor)` pair.
///
/// Seeded with zero weights and unit error: errors lie in `[0, 1]`, so any
/// selector that is ever strictly better than the worst case replaces the seed.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorTracker {
    pub best_weight: Array3<f64>,
    pub best_error: Array2<f64>,
}

impl ErrorTracker {
    pub fn new(shape: WeightShape) -> Self {
        let (o, p, d) = shape;
        Self {
            best_weight: Array3::zeros((o, p, d)),
            best_error: Array2::ones((o, p)),
        }
    }

    /// Folds the current iterate into the tracker; see [`pairwise_select`].
    pub fn merge(&mut self, curr_error: &Array2<f64>, curr_weight: &Array3<f64>) -> Result<()> {
        let (weight, error) = pairwise_select(
            curr_error,
            &self.best_error,
            curr_weight,
            &self.best_weight,
        )?;
        self.best_weight = weight;
        self.best_error = error;
        Ok(())
    }
}

/// Elementwise merge of the current iterate with the best so far.
///
/// Where `curr_error < min_error` (strictly) the current error and weight
/// vector are taken, elsewhere the previous best is kept unchanged. Returns
/// `(weight [O, P, D], error [O, P])`.
pub fn pairwise_select(
    curr_error: &Array2<f64>,
    min_error: &Array2<f64>,
    curr_weight: &Array3<f64>,
    min_weight: &Array3<f64>,
) -> Result<(Array3<f64>, Array2<f64>)> {
    if curr_error.dim() != min_error.dim() {
        return Err(SelectionError::shape(
            "error tracker",
            min_error.dim(),
            curr_error.dim(),
        ));
    }
    if curr_weight.dim() != min_weight.dim() {
        return Err(SelectionError::shape(
            "weight tracker",
            min_weight.dim(),
            curr_weight.dim(),
        ));
    }
    let (o, p, _) = min_weight.dim();
    if min_error.dim() != (o, p) {
        return Err(SelectionError::shape("error tracker", (o, p), min_error.dim()));
    }

    let improved = Zip::from(curr_error)
        .and(min_error)
        .map_collect(|&curr, &best| curr < best);

    let error = Zip::from(&improved)
        .and(curr_error)
        .and(min_error)
        .map_collect(|&better, &curr, &best| if better { curr } else { best });

    let mut weight = min_weight.clone();
    Zip::from(weight.lanes_mut(Axis(2)))
        .and(curr_weight.lanes(Axis(2)))
        .and(&improved)
        .for_each(|mut best, curr, &better| {
            if better {
                best.assign(&curr);
            }
        });

    Ok((weight, error))
}

/// Runs a fixed number of projected-gradient iterations over a selector model.
///
/// Once built via [`PgdTrainerBuilder`] it is immutable and can be reused
/// across calls. There is no early stopping: every `fit` performs exactly
/// `num_iter` optimiser steps.
#[derive(Debug, Clone)]
pub struct PgdTrainer<O = ProjectedGradientDescent> {
    pub(crate) num_iter: usize,
    pub(crate) optimizer: O,
}

/// Fluent builder for [`PgdTrainer`].
///
/// Defaults:
/// - `num_iter`: 1000
#[derive(Debug, Clone)]
pub struct PgdTrainerBuilder<O> {
    num_iter: usize,
    optimizer: O,
}

impl<O> PgdTrainerBuilder<O> {
    pub fn new(optimizer: O) -> Self {
        Self {
            num_iter: 1000,
            optimizer,
        }
    }

    pub fn num_iter(mut self, num_iter: usize) -> Self {
        self.num_iter = num_iter;
        self
    }

    pub fn build(self) -> PgdTrainer<O> {
        PgdTrainer {
            num_iter: self.num_iter,
            optimizer: self.optimizer,
        }
    }
}

impl<O> PgdTrainer<O> {
    /// Convenience constructor that starts the builder pattern.
    pub fn builder(optimizer: O) -> PgdTrainerBuilder<O> {
        PgdTrainerBuilder::new(optimizer)
    }

    pub fn num_iter(&self) -> usize {
        self.num_iter
    }

    /// Optimises `model` on `train`.
    ///
    /// Without `val`, the weights after the last iteration are returned as is,
    /// even if an earlier iterate was better. With `val`, every iterate is
    /// scored on the validation split and the model is rebuilt from the
    /// per-pair best weights seen over the run.
    ///
    /// # Errors
    /// Shape errors from the model or mismatched train/validation widths.
    pub fn fit<M, D, P>(
        &self,
        mut model: M,
        train: &D,
        val: Option<&D>,
        progress: &mut P,
    ) -> Result<M>
    where
        M: SelectorModel,
        D: MultiLabelledDataset + ?Sized,
        O: Optimizer<M>,
        P: ProgressObserver + ?Sized,
    {
        // labels:   [num train sample, num predictors]
        // features: [num train sample, dim sample]
        let (labels_train, features_train) = train.all()?;
        let (o, p, _) = model.size();
        progress.on_start(o * p, self.num_iter);

        let model = match val {
            Some(val) => {
                if val.dim_label() != train.dim_label() || val.dim_feature() != train.dim_feature()
                {
                    return Err(SelectionError::shape(
                        "validation split",
                        (train.dim_label(), train.dim_feature()),
                        (val.dim_label(), val.dim_feature()),
                    ));
                }
                let (labels_val, features_val) = val.all()?;
                debug!(
                    "pgd with validation: train {:?}, val {:?}",
                    features_train.dim(),
                    features_val.dim()
                );

                let mut tracker = ErrorTracker::new(model.size());
                for iter in 0..self.num_iter {
                    let stats = self
                        .optimizer
                        .step(&mut model, &labels_train, &features_train)?;

                    let conditional_error_rates =
                        model.conditional_one_rate(features_val.view(), labels_val.t())?;
                    tracker.merge(&conditional_error_rates, model.weights())?;
                    progress.on_iteration(iter, stats);
                }
                M::from_weights(tracker.best_weight)?
            }
            None => {
                debug!("pgd without validation: train {:?}", features_train.dim());
                for iter in 0..self.num_iter {
                    let stats = self
                        .optimizer
                        .step(&mut model, &labels_train, &features_train)?;
                    progress.on_iteration(iter, stats);
                }
                model
            }
        };

        progress.on_finish();
        Ok(model)
    }
}
