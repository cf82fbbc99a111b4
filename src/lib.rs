//! Conditional classifier selection.
//!
//! Given a dataset of `(features, labels)` pairs where every label column is the
//! output of one candidate predictor, and a batch of observations `[O, P, D]`,
//! [`ReferenceClass`] learns one sparse linear selector per
//! `(observation, predictor)` pair with projected gradient descent. A sample is
//! accepted by a selector when `w · x > 0`. For each observation the predictor
//! whose selector has the lowest conditional error on held-out data is kept.
//!
//! ```no_run
//! use ndarray::Array3;
//! use refclass::{InMemoryDataset, ReferenceClass, SelectionConfig};
//!
//! # fn main() -> refclass::Result<()> {
//! let dataset = InMemoryDataset::from_rows(
//!     vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0]],
//!     vec![vec![1.0, -1.0], vec![-0.5, 2.0], vec![0.3, 0.3], vec![2.0, 1.0]],
//! )?;
//! let config = SelectionConfig::builder()
//!     .subset_fracs(vec![0.5])
//!     .num_iter(100)
//!     .seed(7)
//!     .build()?;
//!
//! let learner = ReferenceClass::new("demo", &dataset, &config)?;
//! let selection = learner.select(Array3::ones((3, 2, 2)))?;
//! println!("{:?} {:?}", selection.min_val, selection.min_ids);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod model;
pub mod optimizer;
pub mod progress;
pub mod selection;
pub mod serialization;
pub mod trainer;

pub use config::{Device, SelectionConfig, SelectionConfigBuilder};
pub use dataset::{InMemoryDataset, MultiLabelledDataset, Splits, Subset};
pub use error::{Result, SelectionError};
pub use model::{InferenceModel, LinearModel, ReducedSelector, SelectorModel};
pub use optimizer::{Optimizer, ProjectedGradientDescent, StepStats, CONVERGENCE_THRESHOLD};
pub use progress::{LogProgress, NoProgress, ProgressObserver};
pub use selection::{ReferenceClass, Selection};
pub use serialization::SerializableParams;
pub use trainer::{pairwise_select, ErrorTracker, PgdTrainer, PgdTrainerBuilder};
