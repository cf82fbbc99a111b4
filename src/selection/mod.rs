//! Reference-class selection over a batch of observations.
//!
//! [`ReferenceClass`] owns the dataset partition. Each call to
//! [`select`](ReferenceClass::select) trains one selector per
//! `(observation, predictor)` pair, scores them on the evaluation split and
//! keeps, for every observation, the predictor whose selector has the lowest
//! conditional error.

use crate::config::{Device, SelectionConfig};
use crate::dataset::{MultiLabelledDataset, Splits};
use crate::error::{Result, SelectionError};
use crate::model::{LinearModel, ReducedSelector, SelectorModel};
use crate::optimizer::ProjectedGradientDescent;
use crate::progress::{LogProgress, ProgressObserver};
use crate::trainer::PgdTrainer;
use log::info;
use ndarray::{Array1, Array2, Array3, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Result of one selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Minimum evaluation error per observation, `[O]`.
    pub min_val: Array1<f64>,
    /// Index of the predictor achieving it, `[O]`, values in `[0, P)`.
    pub min_ids: Array1<usize>,
    /// Selector of the chosen predictor for every observation, `[O, D]`.
    pub model: ReducedSelector,
}

/// Row-wise minimum and first-occurrence argmin of `[O, P]` errors.
///
/// NaN entries are skipped.
///
/// # Errors
/// [`SelectionError::Dataset`] if a row has no comparable entry (empty or all NaN).
pub fn min_by_row(errors: &Array2<f64>) -> Result<(Array1<f64>, Array1<usize>)> {
    let mut min_val = Array1::zeros(errors.nrows());
    let mut min_ids = Array1::zeros(errors.nrows());
    for (o, row) in errors.rows().into_iter().enumerate() {
        let best = row
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_nan())
            .fold(None, |best: Option<(usize, f64)>, (p, &e)| match best {
                Some((_, b)) if b <= e => best,
                _ => Some((p, e)),
            });
        let (id, val) = best.ok_or_else(|| {
            SelectionError::Dataset(format!(
                "conditional errors of observation {} have no minimum: {}",
                o, row
            ))
        })?;
        min_val[o] = val;
        min_ids[o] = id;
    }
    Ok((min_val, min_ids))
}

/// Conditional learner for finite-class classification.
///
/// The dataset is split once, at construction; every call to `select`
/// reuses that partition and allocates fresh weight and error state.
#[derive(Debug)]
pub struct ReferenceClass<'a, D: ?Sized> {
    header: String,
    splits: Splits<'a, D>,
    num_iter: usize,
    lr: f64,
    device: Device,
    verbose: bool,
}

impl<'a, D: MultiLabelledDataset + ?Sized> ReferenceClass<'a, D> {
    /// Validates `config` and partitions `dataset`.
    ///
    /// `prev_header` prefixes every log line of this run.
    ///
    /// # Errors
    /// Configuration errors (bad fractions, empty subsets, bad hyperparameters)
    /// are raised here, before any optimisation work.
    pub fn new(prev_header: &str, dataset: &'a D, config: &SelectionConfig) -> Result<Self> {
        let header = [prev_header, "learning reference class", "-"]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        info!(
            "{} training dataset feature size: {:?}",
            header,
            (dataset.len(), dataset.dim_feature())
        );
        info!(
            "{} training dataset label size: {:?}",
            header,
            (dataset.len(), dataset.dim_label())
        );

        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let splits = Splits::new(dataset, &config.subset_fracs, &mut rng)?;
        info!(
            "{} subset sizes (train, val, eval): {:?} on {}",
            header,
            splits.sizes(),
            config.device
        );

        Ok(Self {
            header,
            splits,
            num_iter: config.num_iter,
            lr: config.lr,
            device: config.device,
            verbose: config.verbose,
        })
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn splits(&self) -> &Splits<'a, D> {
        &self.splits
    }

    /// `(train, validation, evaluation)` sample counts.
    pub fn split_sizes(&self) -> (usize, Option<usize>, usize) {
        self.splits.sizes()
    }

    /// Runs selection, reporting progress through the `log` facade.
    pub fn select(&self, observations: Array3<f64>) -> Result<Selection> {
        let mut progress = LogProgress::new(format!("{} converging", self.header), self.verbose);
        self.select_with(observations, &mut progress)
    }

    /// Runs selection with a caller-supplied progress observer.
    ///
    /// 1. build a [`LinearModel`] from `observations` `[O, P, D]`
    /// 2. optimise it on the train split (tracking the best iterate on
    ///    validation when a validation split exists)
    /// 3. score the learned selectors on the evaluation split
    /// 4. keep, per observation, the predictor with the lowest error
    ///    (ties go to the lowest index) and gather its selector
    ///
    /// # Errors
    /// [`SelectionError::Shape`] if `P` or `D` disagree with the dataset.
    pub fn select_with<P>(&self, observations: Array3<f64>, progress: &mut P) -> Result<Selection>
    where
        P: ProgressObserver + ?Sized,
    {
        let (o, p, d) = observations.dim();
        let eval = &self.splits.eval;
        if p != eval.dim_label() || d != eval.dim_feature() {
            return Err(SelectionError::shape(
                "observations",
                (o, eval.dim_label(), eval.dim_feature()),
                (o, p, d),
            ));
        }

        let trainer = PgdTrainer::builder(ProjectedGradientDescent::new(self.lr))
            .num_iter(self.num_iter)
            .build();
        let selectors = trainer.fit(
            LinearModel::from_observations(observations)?,
            &self.splits.train,
            self.splits.val.as_ref(),
            progress,
        )?;
        info!(
            "{} learned selectors size: {:?}",
            self.header,
            selectors.size()
        );

        let (labels_eval, features_eval) = eval.all()?;

        // perform model selection on evaluation set
        let errors = selectors.conditional_one_rate(features_eval.view(), labels_eval.t())?;
        let (min_val, min_ids) = min_by_row(&errors)?;

        // reduce the model to the best classifier-selector pair
        let reduced = selectors.reduce(&min_ids, Axis(1))?;
        Ok(Selection {
            min_val,
            min_ids,
            model: ReducedSelector::new(reduced),
        })
    }
}
