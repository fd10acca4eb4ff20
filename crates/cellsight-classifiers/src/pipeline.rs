//! End-to-end analysis: scale, split, classify, evaluate, sweep.
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::data_handling::{train_test_split, Dataset, LabelMapping};
use crate::error::Result;
use crate::stats::ClassBalance;
use crate::sweep::{evaluate_k, sweep_k, KSweep, SweepResult};

/// Confidence level of the reported odds-ratio interval.
pub const ODDS_RATIO_CONFIDENCE: f64 = 0.95;

/// Everything the report needs from one run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub config: PipelineConfig,
    pub n_samples: usize,
    pub n_features: usize,
    pub mapping: LabelMapping,
    pub balance: ClassBalance,
    pub train_balance: ClassBalance,
    pub test_balance: ClassBalance,
    /// Result for the configured K.
    pub headline: SweepResult,
    pub headline_interval: Option<(f64, f64)>,
    pub sweep: KSweep,
    pub selected: Option<SweepResult>,
}

/// Run the whole analysis on an already loaded dataset.
///
/// Scaling parameters are fitted over the full dataset before the split.
pub fn run_pipeline(dataset: &Dataset, config: &PipelineConfig) -> Result<PipelineSummary> {
    config.validate()?;

    let (scaled, _scaler) = dataset.scaled(config.scaling)?;
    log::info!("Scaled {} features with '{}'", scaled.n_features(), config.scaling);

    let split = train_test_split(&scaled, config.split_ratio, config.seed)?;
    log::info!(
        "Training set: {} rows, test set: {} rows",
        split.train.len(),
        split.test.len()
    );

    let sweep = sweep_k(&split.train, &split.test, config.k_min..=config.k_max)?;
    let headline = match sweep.get(config.k) {
        Some(result) => *result,
        None => evaluate_k(&split.train, &split.test, config.k)?,
    };
    if !headline.odds_ratio.is_defined() {
        log::warn!(
            "Odds ratio for k={} is undefined (FN = {}, FP = {})",
            headline.k,
            headline.false_negatives,
            headline.false_positives
        );
    }
    let headline_interval = headline
        .confusion
        .odds_ratio_interval(ODDS_RATIO_CONFIDENCE);

    let selected = sweep.select(&config.selection_rule()?).copied();
    match &selected {
        Some(result) => log::info!("Selected k={} (OR {})", result.k, result.odds_ratio),
        None => log::warn!("No K produced a defined odds ratio; nothing selected"),
    }

    Ok(PipelineSummary {
        config: config.clone(),
        n_samples: dataset.len(),
        n_features: dataset.n_features(),
        mapping: dataset.mapping.clone(),
        balance: ClassBalance::of(dataset),
        train_balance: ClassBalance::of(&split.train),
        test_balance: ClassBalance::of(&split.test),
        headline,
        headline_interval,
        sweep,
        selected,
    })
}
