//! Hyperparameters for a reference-class selection run.
//!
//! [`SelectionConfig`] can be built fluently or loaded from JSON. It is
//! validated once, when a [`ReferenceClass`](crate::selection::ReferenceClass)
//! is constructed, so a bad fraction list never reaches the optimiser.

use crate::dataset::split::validate_fractions;
use crate::error::{Result, SelectionError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Compute device every internally allocated tensor is placed on.
///
/// Only host memory is available with the `ndarray` storage used here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cpu,
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
        }
    }
}

fn default_subset_fracs() -> Vec<f64> {
    vec![0.8]
}

fn default_num_iter() -> usize {
    1000
}

fn default_lr() -> f64 {
    0.01
}

fn default_verbose() -> bool {
    true
}

/// Configuration of a selection run.
///
/// Defaults:
/// - `subset_fracs`: `[0.8]` (train/eval, no validation)
/// - `num_iter`: 1000
/// - `lr`: 0.01
/// - `seed`: `None` (partition drawn from OS entropy)
/// - `device`: [`Device::Cpu`]
/// - `verbose`: true
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_subset_fracs")]
    pub subset_fracs: Vec<f64>,
    #[serde(default = "default_num_iter")]
    pub num_iter: usize,
    #[serde(default = "default_lr")]
    pub lr: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub device: Device,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            subset_fracs: default_subset_fracs(),
            num_iter: default_num_iter(),
            lr: default_lr(),
            seed: None,
            device: Device::Cpu,
            verbose: default_verbose(),
        }
    }
}

impl SelectionConfig {
    pub fn builder() -> SelectionConfigBuilder {
        SelectionConfigBuilder::default()
    }

    /// Parses a configuration from a JSON document. Missing keys take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Checks the fraction list and the optimiser hyperparameters.
    ///
    /// # Errors
    /// - [`SelectionError::InvalidFractionCount`] unless 1 or 2 fractions are given
    /// - [`SelectionError::InvalidFraction`] for a fraction outside (0, 1]
    /// - [`SelectionError::FractionSumExceeded`] if the fractions sum past 1
    /// - [`SelectionError::InvalidParameter`] for `num_iter == 0` or a non-positive `lr`
    pub fn validate(&self) -> Result<()> {
        validate_fractions(&self.subset_fracs)?;
        if self.num_iter == 0 {
            return Err(SelectionError::InvalidParameter(
                "num_iter must be positive".into(),
            ));
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            return Err(SelectionError::InvalidParameter(format!(
                "lr must be a positive finite number, got {}",
                self.lr
            )));
        }
        Ok(())
    }

    /// Whether a validation split is carved out of the dataset.
    pub fn has_validation(&self) -> bool {
        self.subset_fracs.len() == 2
    }
}

/// Fluent builder for [`SelectionConfig`].
#[derive(Debug, Clone, Default)]
pub struct SelectionConfigBuilder {
    config: SelectionConfig,
}

impl SelectionConfigBuilder {
    pub fn subset_fracs(mut self, fracs: impl Into<Vec<f64>>) -> Self {
        self.config.subset_fracs = fracs.into();
        self
    }

    pub fn num_iter(mut self, num_iter: usize) -> Self {
        self.config.num_iter = num_iter;
        self
    }

    pub fn lr(mut self, lr: f64) -> Self {
        self.config.lr = lr;
        self
    }

    /// Seeds the dataset partition so repeated runs see the same split.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn device(mut self, device: Device) -> Self {
        self.config.device = device;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<SelectionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
