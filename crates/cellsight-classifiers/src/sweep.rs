//! Sweep K over an inclusive range and pick a value.
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::data_handling::Dataset;
use crate::error::{CellsightError, Result};
use crate::models::{ClassifierModel, KnnClassifier};
use crate::stats::{ConfusionMatrix, OddsRatio};

/// Outcome of evaluating one K on the test set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepResult {
    pub k: usize,
    pub odds_ratio: OddsRatio,
    pub false_negatives: usize,
    pub false_positives: usize,
    pub confusion: ConfusionMatrix,
}

impl SweepResult {
    pub fn from_confusion(k: usize, confusion: ConfusionMatrix) -> Self {
        Self {
            k,
            odds_ratio: confusion.odds_ratio(),
            false_negatives: confusion.false_negative,
            false_positives: confusion.false_positive,
            confusion,
        }
    }
}

/// Rule for choosing K from a sweep.
///
/// Every result whose odds ratio is at least `best * (1 - tolerance)` is a
/// candidate; the smallest candidate K is selected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRule {
    pub tolerance: f64,
}

impl SelectionRule {
    pub fn new(tolerance: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&tolerance) {
            return Err(CellsightError::InvalidConfig(format!(
                "selection tolerance must lie in [0, 1), got {}",
                tolerance
            )));
        }
        Ok(Self { tolerance })
    }
}

impl Default for SelectionRule {
    fn default() -> Self {
        Self { tolerance: 0.05 }
    }
}

/// All results of a sweep, in ascending K order.
#[derive(Debug, Clone, Serialize)]
pub struct KSweep {
    results: Vec<SweepResult>,
}

impl KSweep {
    pub fn results(&self) -> &[SweepResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, k: usize) -> Option<&SweepResult> {
        self.results.iter().find(|r| r.k == k)
    }

    /// Results ordered by odds ratio, largest first. Undefined ratios come
    /// last; ties keep ascending K.
    pub fn ranked(&self) -> Vec<&SweepResult> {
        let mut ranked: Vec<&SweepResult> = self.results.iter().collect();
        ranked.sort_by(|a, b| a.odds_ratio.rank_cmp(&b.odds_ratio).then(a.k.cmp(&b.k)));
        ranked
    }

    /// Smallest K whose odds ratio is within the rule's tolerance of the best.
    /// `None` when no K produced a defined odds ratio.
    pub fn select(&self, rule: &SelectionRule) -> Option<&SweepResult> {
        let best = self
            .results
            .iter()
            .filter_map(|r| r.odds_ratio.value())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))?;
        let threshold = best * (1.0 - rule.tolerance);
        self.results
            .iter()
            .filter(|r| r.odds_ratio.value().map_or(false, |v| v >= threshold))
            .min_by_key(|r| r.k)
    }
}

/// Evaluate a single K: fit on `train`, predict `test`, tabulate.
pub fn evaluate_k(train: &Dataset, test: &Dataset, k: usize) -> Result<SweepResult> {
    let model = KnnClassifier::fitted(k, train)?;
    let predicted = model.predict(&test.features)?;
    let confusion = ConfusionMatrix::from_predictions(&predicted, &test.labels)?;
    Ok(SweepResult::from_confusion(k, confusion))
}

/// Run KNN + evaluation for every K in `k_range`.
///
/// # Errors
///
/// `InvalidConfig` when the range is empty, starts at zero, or ends beyond the
/// training set size. The range is checked before any classification is run.
pub fn sweep_k(train: &Dataset, test: &Dataset, k_range: RangeInclusive<usize>) -> Result<KSweep> {
    let (k_min, k_max) = (*k_range.start(), *k_range.end());
    if k_range.is_empty() || k_min == 0 {
        return Err(CellsightError::InvalidConfig(format!(
            "K range {}..={} must be non-empty and start at 1 or above",
            k_min, k_max
        )));
    }
    if k_max > train.len() {
        return Err(CellsightError::InvalidConfig(format!(
            "K range ends at {} but the training set has only {} rows",
            k_max,
            train.len()
        )));
    }

    let results = k_range
        .map(|k| {
            let result = evaluate_k(train, test, k)?;
            log::debug!(
                "k={:>2}: OR {} FN {} FP {}",
                k,
                result.odds_ratio,
                result.false_negatives,
                result.false_positives
            );
            Ok(result)
        })
        .collect::<Result<Vec<_>>>()?;

    log::info!("Swept K over {}..={} ({} values)", k_min, k_max, results.len());
    Ok(KSweep { results })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(k: usize, tn: usize, fneg: usize, fpos: usize, tp: usize) -> SweepResult {
        SweepResult::from_confusion(
            k,
            ConfusionMatrix {
                true_negative: tn,
                false_negative: fneg,
                false_positive: fpos,
                true_positive: tp,
            },
        )
    }

    #[test]
    fn select_prefers_smallest_k_within_tolerance() {
        // OR: k1 = 40, k3 = 100, k5 = 98, k7 = undefined
        let sweep = KSweep {
            results: vec![
                result(1, 40, 2, 5, 10),
                result(3, 100, 1, 5, 5),
                result(5, 98, 1, 5, 5),
                result(7, 50, 0, 3, 10),
            ],
        };
        let chosen = sweep.select(&SelectionRule::new(0.05).unwrap()).unwrap();
        assert_eq!(chosen.k, 3);
        let chosen = sweep.select(&SelectionRule::new(0.7).unwrap()).unwrap();
        assert_eq!(chosen.k, 1);
    }

    #[test]
    fn select_none_without_defined_ratio() {
        let sweep = KSweep {
            results: vec![result(1, 10, 0, 0, 10)],
        };
        assert!(sweep.select(&SelectionRule::default()).is_none());
    }

    #[test]
    fn ranked_ties_keep_ascending_k() {
        let sweep = KSweep {
            results: vec![
                result(1, 10, 0, 1, 10),
                result(2, 20, 2, 2, 20),
                result(3, 20, 2, 2, 20),
            ],
        };
        let ks: Vec<usize> = sweep.ranked().iter().map(|r| r.k).collect();
        assert_eq!(ks, vec![2, 3, 1]);
    }

    #[test]
    fn selection_rule_rejects_out_of_range() {
        assert!(SelectionRule::new(1.0).is_err());
        assert!(SelectionRule::new(-0.1).is_err());
    }
}
