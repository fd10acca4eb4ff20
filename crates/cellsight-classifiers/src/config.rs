use serde::{Deserialize, Serialize};

use crate::error::{CellsightError, Result};
use crate::preprocessing::ScalingMethod;
use crate::sweep::SelectionRule;

/// How the input table is read.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Field delimiter, a single ASCII character.
    pub delimiter: char,
    /// Raw label value treated as the positive class.
    pub positive_label: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            positive_label: "M".to_string(),
        }
    }
}

impl LoaderConfig {
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(CellsightError::InvalidConfig(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )))
        }
    }
}

/// Central configuration for one analysis run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub loader: LoaderConfig,
    pub scaling: ScalingMethod,
    /// Expected fraction of rows assigned to the training set.
    pub split_ratio: f64,
    pub seed: u64,
    /// K used for the headline confusion matrix.
    pub k: usize,
    pub k_min: usize,
    pub k_max: usize,
    pub selection_tolerance: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            scaling: ScalingMethod::Normalize,
            split_ratio: 0.75,
            seed: 123,
            k: 5,
            k_min: 1,
            k_max: 25,
            selection_tolerance: 0.05,
        }
    }
}

impl PipelineConfig {
    /// Check ranges that do not depend on the data. Limits that depend on the
    /// training set size are checked where the training set is known.
    pub fn validate(&self) -> Result<()> {
        if !(self.split_ratio > 0.0 && self.split_ratio < 1.0) {
            return Err(CellsightError::InvalidConfig(format!(
                "split_ratio must lie in (0, 1), got {}",
                self.split_ratio
            )));
        }
        if self.k == 0 {
            return Err(CellsightError::InvalidConfig("k must be at least 1".to_string()));
        }
        if self.k_min == 0 || self.k_min > self.k_max {
            return Err(CellsightError::InvalidConfig(format!(
                "k range {}..={} must be non-empty and start at 1 or above",
                self.k_min, self.k_max
            )));
        }
        if self.loader.positive_label.trim().is_empty() {
            return Err(CellsightError::InvalidConfig(
                "positive_label must not be empty".to_string(),
            ));
        }
        self.loader.delimiter_byte()?;
        self.selection_rule()?;
        Ok(())
    }

    pub fn selection_rule(&self) -> Result<SelectionRule> {
        SelectionRule::new(self.selection_tolerance)
    }
}
