//! Data structures for diagnostic datasets and the train/test split.
//!
//! A `Dataset` holds the feature matrix, one `Diagnosis` per row and the
//! mapping back to the raw label symbols found in the input file. All
//! operations return new values; nothing here mutates a dataset in place.
use std::fmt;

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{CellsightError, Result};
use crate::preprocessing::{Scaler, ScalingMethod};

/// Two-valued class label. `Positive` is the class of interest (malignant in
/// the reference dataset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    Negative,
    Positive,
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnosis::Negative => write!(f, "negative"),
            Diagnosis::Positive => write!(f, "positive"),
        }
    }
}

/// Raw label symbols as they appeared in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMapping {
    pub positive: String,
    pub negative: String,
}

impl LabelMapping {
    pub fn new(positive: impl Into<String>, negative: impl Into<String>) -> Self {
        Self {
            positive: positive.into(),
            negative: negative.into(),
        }
    }

    pub fn symbol(&self, diagnosis: Diagnosis) -> &str {
        match diagnosis {
            Diagnosis::Positive => &self.positive,
            Diagnosis::Negative => &self.negative,
        }
    }

    pub fn parse(&self, raw: &str) -> Option<Diagnosis> {
        let raw = raw.trim();
        if raw == self.positive {
            Some(Diagnosis::Positive)
        } else if raw == self.negative {
            Some(Diagnosis::Negative)
        } else {
            None
        }
    }
}

impl Default for LabelMapping {
    fn default() -> Self {
        Self::new("M", "B")
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Array2<f64>,
    pub labels: Array1<Diagnosis>,
    pub feature_names: Vec<String>,
    pub mapping: LabelMapping,
}

impl Dataset {
    /// Build a dataset, checking that rows, labels and feature names line up
    /// and that every feature value is finite.
    pub fn new(
        features: Array2<f64>,
        labels: Array1<Diagnosis>,
        feature_names: Vec<String>,
        mapping: LabelMapping,
    ) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(CellsightError::InvalidInput(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }
        if features.ncols() != feature_names.len() {
            return Err(CellsightError::InvalidInput(format!(
                "{} feature columns but {} feature names",
                features.ncols(),
                feature_names.len()
            )));
        }
        if let Some(((row, col), _)) = features.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(CellsightError::InvalidInput(format!(
                "non-finite value for feature '{}' at row {}",
                feature_names[col],
                row + 1
            )));
        }
        Ok(Self {
            features,
            labels,
            feature_names,
            mapping,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn count(&self, diagnosis: Diagnosis) -> usize {
        self.labels.iter().filter(|&&d| d == diagnosis).count()
    }

    /// Keep only the rows at `indices`, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
            mapping: self.mapping.clone(),
        }
    }

    /// Return a copy with the feature matrix replaced, keeping labels and names.
    pub fn with_features(&self, features: Array2<f64>) -> Result<Dataset> {
        Dataset::new(
            features,
            self.labels.clone(),
            self.feature_names.clone(),
            self.mapping.clone(),
        )
    }

    /// Fit a scaler over this whole dataset and return the scaled copy.
    pub fn scaled(&self, method: ScalingMethod) -> Result<(Dataset, Scaler)> {
        let scaler = Scaler::fit(method, &self.features, &self.feature_names)?;
        let scaled = scaler.transform(&self.features)?;
        Ok((self.with_features(scaled)?, scaler))
    }

    pub fn log_input_data_summary(&self) {
        log::info!(
            "{} samples ({} {} / {} {}), {} features",
            self.len(),
            self.count(Diagnosis::Positive),
            self.mapping.positive,
            self.count(Diagnosis::Negative),
            self.mapping.negative,
            self.n_features()
        );
    }
}

/// A disjoint, covering partition of a dataset into training and test rows.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
    /// Row indices of `train` in the source dataset.
    pub train_indices: Vec<usize>,
    /// Row indices of `test` in the source dataset.
    pub test_indices: Vec<usize>,
}

/// Assign each row to the training side with probability `ratio`.
///
/// Rows are visited in input order and each draws one Bernoulli sample from a
/// `StdRng` seeded with `seed`, so the same seed and input always give the
/// same split. The training fraction is only expected to be close to `ratio`.
///
/// # Errors
///
/// `InvalidConfig` if `ratio` is outside (0, 1) or either side ends up empty.
pub fn train_test_split(dataset: &Dataset, ratio: f64, seed: u64) -> Result<Split> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(CellsightError::InvalidConfig(format!(
            "split ratio must lie in (0, 1), got {}",
            ratio
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_indices = Vec::with_capacity((dataset.len() as f64 * ratio) as usize + 1);
    let mut test_indices = Vec::new();
    for idx in 0..dataset.len() {
        if rng.gen_bool(ratio) {
            train_indices.push(idx);
        } else {
            test_indices.push(idx);
        }
    }

    if train_indices.is_empty() || test_indices.is_empty() {
        return Err(CellsightError::InvalidConfig(format!(
            "degenerate split: {} training rows and {} test rows",
            train_indices.len(),
            test_indices.len()
        )));
    }

    log::debug!(
        "Split {} rows into {} training / {} test (ratio {}, seed {})",
        dataset.len(),
        train_indices.len(),
        test_indices.len(),
        ratio,
        seed
    );

    Ok(Split {
        train: dataset.select_rows(&train_indices),
        test: dataset.select_rows(&test_indices),
        train_indices,
        test_indices,
    })
}
