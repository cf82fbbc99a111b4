//! Convergence progress reporting.
//!
//! The optimiser calls a [`ProgressObserver`] once per iteration with the
//! running count of converged `(observation, predictor)` pairs. Observers only
//! report: nothing they do can stop or alter the loop.

use crate::optimizer::StepStats;
use log::{debug, info};

pub trait ProgressObserver {
    /// Called once before the first iteration with the number of tracked pairs.
    fn on_start(&mut self, _total: usize, _num_iter: usize) {}

    /// Called after every iteration. `iter` is zero-based.
    fn on_iteration(&mut self, iter: usize, stats: StepStats);

    /// Called once after the last iteration.
    fn on_finish(&mut self) {}
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_iteration(&mut self, _iter: usize, _stats: StepStats) {}
}

/// Reports progress through the `log` facade, prefixed by a run header.
///
/// Iterations are logged at `debug` level, the start and the final converged
/// count at `info`. When `verbose` is false only the final count is kept.
#[derive(Debug, Clone)]
pub struct LogProgress {
    header: String,
    verbose: bool,
    last: Option<StepStats>,
}

impl LogProgress {
    pub fn new(header: impl Into<String>, verbose: bool) -> Self {
        Self {
            header: header.into(),
            verbose,
            last: None,
        }
    }

    /// Stats of the most recent iteration, if any ran.
    pub fn last(&self) -> Option<StepStats> {
        self.last
    }
}

impl ProgressObserver for LogProgress {
    fn on_start(&mut self, total: usize, num_iter: usize) {
        self.last = None;
        if self.verbose {
            info!(
                "{} converging: {} selector pairs over {} iterations",
                self.header, total, num_iter
            );
        }
    }

    fn on_iteration(&mut self, iter: usize, stats: StepStats) {
        if self.verbose {
            debug!(
                "{} iteration {}: {}/{} converged",
                self.header, iter, stats.converged, stats.total
            );
        }
        self.last = Some(stats);
    }

    fn on_finish(&mut self) {
        if let Some(stats) = self.last {
            info!(
                "{} converged: {}/{}",
                self.header, stats.converged, stats.total
            );
        }
    }
}

impl<F> ProgressObserver for F
where
    F: FnMut(usize, StepStats),
{
    fn on_iteration(&mut self, iter: usize, stats: StepStats) {
        self(iter, stats)
    }
}
