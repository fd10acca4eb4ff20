//! End-to-end runs of the analysis pipeline and its report.

mod common;

use cellsight_classifiers::config::PipelineConfig;
use cellsight_classifiers::data_handling::Diagnosis;
use cellsight_classifiers::error::CellsightError;
use cellsight_classifiers::pipeline::run_pipeline;
use cellsight_classifiers::preprocessing::ScalingMethod;
use cellsight_classifiers::report::build_report;
use cellsight_classifiers::report::summary::{
    SECTION_BALANCE, SECTION_CONFUSION, SECTION_INPUT, SECTION_ODDS, SECTION_SELECTION,
    SECTION_SWEEP,
};

#[test]
fn reference_run_produces_consistent_summary() {
    common::init_logging();
    let ds = common::reference_like_dataset();
    let summary = run_pipeline(&ds, &PipelineConfig::default()).unwrap();

    assert_eq!(summary.n_samples, common::N_ROWS);
    assert_eq!(summary.n_features, common::N_FEATURES);
    assert_eq!(summary.balance.positive, common::N_MALIGNANT);
    assert_eq!(
        summary.train_balance.total() + summary.test_balance.total(),
        common::N_ROWS
    );

    // roughly a quarter of the rows are held out
    let test_rows = summary.test_balance.total();
    assert!((100..=185).contains(&test_rows), "test rows {}", test_rows);

    assert_eq!(summary.headline.k, 5);
    assert_eq!(summary.headline.confusion.total(), test_rows);
    assert_eq!(summary.sweep.len(), 25);
    if let Some(selected) = &summary.selected {
        assert!(selected.odds_ratio.is_defined());
        assert!((1..=25).contains(&selected.k));
    }
}

#[test]
fn pipeline_is_reproducible_for_a_seed() {
    let ds = common::reference_like_dataset();
    let config = PipelineConfig::default();
    let a = run_pipeline(&ds, &config).unwrap();
    let b = run_pipeline(&ds, &config).unwrap();
    assert_eq!(a.headline, b.headline);
    assert_eq!(a.sweep.results(), b.sweep.results());
}

#[test]
fn standardize_and_out_of_sweep_k() {
    let ds = common::reference_like_dataset();
    let config = PipelineConfig {
        scaling: ScalingMethod::Standardize,
        k: 30,
        k_max: 10,
        ..PipelineConfig::default()
    };
    let summary = run_pipeline(&ds, &config).unwrap();
    assert_eq!(summary.sweep.len(), 10);
    assert_eq!(summary.headline.k, 30);
    assert!(summary.sweep.get(30).is_none());
}

#[test]
fn invalid_config_rejected() {
    let ds = common::reference_like_dataset();
    let config = PipelineConfig {
        split_ratio: 0.0,
        ..PipelineConfig::default()
    };
    assert!(matches!(
        run_pipeline(&ds, &config),
        Err(CellsightError::InvalidConfig(_))
    ));
}

#[test]
fn k_max_beyond_training_rows_rejected() {
    let ds = common::reference_like_dataset();
    let config = PipelineConfig {
        k_max: 1_000,
        ..PipelineConfig::default()
    };
    assert!(run_pipeline(&ds, &config).is_err());
}

#[test]
fn report_contains_every_section() {
    common::init_logging();
    let ds = common::reference_like_dataset();
    let summary = run_pipeline(&ds, &PipelineConfig::default()).unwrap();
    let report = build_report(&summary);

    for title in [
        SECTION_INPUT,
        SECTION_BALANCE,
        SECTION_ODDS,
        SECTION_SWEEP,
        SECTION_SELECTION,
    ] {
        assert!(report.section(title).is_some(), "missing section {}", title);
    }
    assert!(report
        .sections()
        .iter()
        .any(|s| s.title.starts_with(SECTION_CONFUSION)));

    let sweep = report.section(SECTION_SWEEP).unwrap();
    // header plus one line per K
    assert_eq!(sweep.lines().len(), 26);

    let text = report.to_string();
    assert!(text.contains("KNN diagnostic analysis"));
    assert!(text.contains("predicted B"));
    assert!(text.contains("actual M"));
}

#[test]
fn summary_serializes_to_json() {
    let ds = common::reference_like_dataset();
    let summary = run_pipeline(&ds, &PipelineConfig::default()).unwrap();
    let json: serde_json::Value = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["n_samples"], common::N_ROWS);
    assert_eq!(json["config"]["k"], 5);
    assert_eq!(json["sweep"]["results"].as_array().unwrap().len(), 25);
    assert_eq!(json["mapping"]["positive"], "M");
    assert!(json["headline"]["odds_ratio"]["status"].is_string());
    assert_eq!(
        json["balance"]["positive"].as_u64().unwrap() as usize,
        ds.count(Diagnosis::Positive)
    );
}
