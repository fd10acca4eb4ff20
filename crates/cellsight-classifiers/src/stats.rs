//! Evaluation metrics for two-class predictions.
//!
//! The odds ratio is `(TN * TP) / (FN * FP)`. When the denominator is zero the
//! ratio is reported as [`OddsRatio::Undefined`] instead of an infinite or NaN
//! float.
use std::cmp::Ordering;
use std::fmt;

use ndarray::Array1;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::data_handling::{Dataset, Diagnosis};
use crate::error::{CellsightError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum OddsRatio {
    Defined(f64),
    /// No false negatives or no false positives.
    Undefined,
}

impl OddsRatio {
    pub fn value(&self) -> Option<f64> {
        match self {
            OddsRatio::Defined(v) => Some(*v),
            OddsRatio::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, OddsRatio::Defined(_))
    }

    /// Descending order: larger ratios first, `Undefined` after every defined value.
    pub fn rank_cmp(&self, other: &OddsRatio) -> Ordering {
        match (self, other) {
            (OddsRatio::Defined(a), OddsRatio::Defined(b)) => {
                b.partial_cmp(a).unwrap_or(Ordering::Equal)
            }
            (OddsRatio::Defined(_), OddsRatio::Undefined) => Ordering::Less,
            (OddsRatio::Undefined, OddsRatio::Defined(_)) => Ordering::Greater,
            (OddsRatio::Undefined, OddsRatio::Undefined) => Ordering::Equal,
        }
    }
}

impl fmt::Display for OddsRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OddsRatio::Defined(v) => write!(f, "{:.3}", v),
            OddsRatio::Undefined => write!(f, "undefined"),
        }
    }
}

/// 2x2 table of predicted against actual labels, `Positive` being the class
/// of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_negative: usize,
    pub false_positive: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    /// Build the matrix from parallel predicted / actual sequences.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the sequences are empty or have different lengths.
    pub fn from_predictions(
        predicted: &Array1<Diagnosis>,
        actual: &Array1<Diagnosis>,
    ) -> Result<Self> {
        if predicted.len() != actual.len() {
            return Err(CellsightError::InvalidInput(format!(
                "predicted length {} != actual length {}",
                predicted.len(),
                actual.len()
            )));
        }
        if predicted.is_empty() {
            return Err(CellsightError::InvalidInput(
                "cannot build a confusion matrix from empty label vectors".to_string(),
            ));
        }

        let mut cm = ConfusionMatrix::default();
        for (&p, &a) in predicted.iter().zip(actual.iter()) {
            match (p, a) {
                (Diagnosis::Negative, Diagnosis::Negative) => cm.true_negative += 1,
                (Diagnosis::Negative, Diagnosis::Positive) => cm.false_negative += 1,
                (Diagnosis::Positive, Diagnosis::Negative) => cm.false_positive += 1,
                (Diagnosis::Positive, Diagnosis::Positive) => cm.true_positive += 1,
            }
        }
        Ok(cm)
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_negative + self.false_positive + self.true_positive
    }

    pub fn odds_ratio(&self) -> OddsRatio {
        let denominator = self.false_negative as f64 * self.false_positive as f64;
        if denominator == 0.0 {
            return OddsRatio::Undefined;
        }
        let numerator = self.true_negative as f64 * self.true_positive as f64;
        OddsRatio::Defined(numerator / denominator)
    }

    /// Wald interval for the odds ratio at the given confidence level
    /// (e.g. 0.95). `None` when any cell is zero or `confidence` is not in (0, 1).
    pub fn odds_ratio_interval(&self, confidence: f64) -> Option<(f64, f64)> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return None;
        }
        let cells = [
            self.true_negative,
            self.false_negative,
            self.false_positive,
            self.true_positive,
        ];
        if cells.iter().any(|&c| c == 0) {
            return None;
        }
        let log_or = self.odds_ratio().value()?.ln();
        let se = cells.iter().map(|&c| 1.0 / c as f64).sum::<f64>().sqrt();
        let z = Normal::new(0.0, 1.0)
            .ok()?
            .inverse_cdf(1.0 - (1.0 - confidence) / 2.0);
        Some(((log_or - z * se).exp(), (log_or + z * se).exp()))
    }

    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.true_negative + self.true_positive, self.total())
    }

    /// True positive rate.
    pub fn sensitivity(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// True negative rate.
    pub fn specificity(&self) -> Option<f64> {
        ratio(self.true_negative, self.true_negative + self.false_positive)
    }

    pub fn precision(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

/// Class counts and proportions of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassBalance {
    pub positive: usize,
    pub negative: usize,
}

impl ClassBalance {
    pub fn of(dataset: &Dataset) -> Self {
        Self {
            positive: dataset.count(Diagnosis::Positive),
            negative: dataset.count(Diagnosis::Negative),
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative
    }

    pub fn proportion(&self, diagnosis: Diagnosis) -> Option<f64> {
        let count = match diagnosis {
            Diagnosis::Positive => self.positive,
            Diagnosis::Negative => self.negative,
        };
        ratio(count, self.total())
    }
}
