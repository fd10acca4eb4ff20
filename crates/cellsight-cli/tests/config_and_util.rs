//! Integration tests for CLI config loading, argument overrides and util helpers.

use cellsight_classifiers::config::PipelineConfig;
use cellsight_classifiers::preprocessing::ScalingMethod;
use cellsight_cli::analysis::evaluate::{config_from_arguments, load_pipeline_config};
use cellsight_cli::cli::build_cli;
use cellsight_cli::util::{delimiter_for_path, validate_table_file};

fn evaluate_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["cellsight", "evaluate", "data.csv"];
    argv.extend_from_slice(args);
    let matches = build_cli().try_get_matches_from(argv).unwrap();
    matches.subcommand_matches("evaluate").unwrap().clone()
}

// ---------------------------------------------------------------------------
// validate_table_file
// ---------------------------------------------------------------------------

#[test]
fn validate_csv_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::File::create(&path).unwrap();
    assert!(validate_table_file(&path).is_ok());
}

#[test]
fn validate_uppercase_extension_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DATA.CSV");
    std::fs::File::create(&path).unwrap();
    assert!(validate_table_file(&path).is_ok());
}

#[test]
fn validate_wrong_extension_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    std::fs::File::create(&path).unwrap();
    assert!(validate_table_file(&path).is_err());
}

#[test]
fn validate_nonexistent_file_errors() {
    assert!(validate_table_file(std::path::Path::new("/nonexistent/path/data.csv")).is_err());
}

// ---------------------------------------------------------------------------
// load_pipeline_config
// ---------------------------------------------------------------------------

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let json = serde_json::to_string_pretty(&PipelineConfig::default()).unwrap();
    std::fs::write(&path, json).unwrap();

    let loaded = load_pipeline_config(&path).unwrap();
    assert_eq!(loaded, PipelineConfig::default());
}

#[test]
fn partial_config_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"seed": 7, "loader": {"delimiter": ";"}}"#).unwrap();

    let loaded = load_pipeline_config(&path).unwrap();
    assert_eq!(loaded.seed, 7);
    assert_eq!(loaded.loader.delimiter, ';');
    assert_eq!(loaded.loader.positive_label, "M");
    assert_eq!(loaded.k, 5);
}

#[test]
fn missing_config_file_errors() {
    let err = load_pipeline_config("/nonexistent/config.json").unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read config"));
}

#[test]
fn invalid_json_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = load_pipeline_config(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config"));
}

// ---------------------------------------------------------------------------
// config_from_arguments
// ---------------------------------------------------------------------------

#[test]
fn no_overrides_gives_defaults() {
    let config = config_from_arguments(&evaluate_matches(&[])).unwrap();
    assert_eq!(config, PipelineConfig::default());
}

#[test]
fn overrides_replace_config_values() {
    let matches = evaluate_matches(&[
        "--k",
        "9",
        "--k-min",
        "2",
        "--k-max",
        "15",
        "--scaling",
        "none",
        "--split-ratio",
        "0.6",
        "--seed",
        "99",
        "--tolerance",
        "0.1",
        "--positive-label",
        "B",
    ]);
    let config = config_from_arguments(&matches).unwrap();
    assert_eq!(config.k, 9);
    assert_eq!((config.k_min, config.k_max), (2, 15));
    assert_eq!(config.scaling, ScalingMethod::None);
    assert!((config.split_ratio - 0.6).abs() < 1e-12);
    assert_eq!(config.seed, 99);
    assert!((config.selection_tolerance - 0.1).abs() < 1e-12);
    assert_eq!(config.loader.positive_label, "B");
}

#[test]
fn overrides_apply_on_top_of_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"k": 11, "seed": 5}"#).unwrap();

    let matches = build_cli()
        .try_get_matches_from([
            "cellsight",
            "evaluate",
            "data.csv",
            path.to_str().unwrap(),
            "--seed",
            "6",
        ])
        .unwrap();
    let config = config_from_arguments(matches.subcommand_matches("evaluate").unwrap()).unwrap();
    assert_eq!(config.k, 11);
    assert_eq!(config.seed, 6);
}

#[test]
fn invalid_override_rejected() {
    let matches = evaluate_matches(&["--k-min", "10", "--k-max", "3"]);
    assert!(config_from_arguments(&matches).is_err());
}

#[test]
fn unknown_scaling_rejected_by_parser() {
    let result =
        build_cli().try_get_matches_from(["cellsight", "evaluate", "data.csv", "--scaling", "log"]);
    assert!(result.is_err());
}

#[test]
fn tsv_input_uses_tab_delimiter() {
    let matches = build_cli()
        .try_get_matches_from(["cellsight", "evaluate", "cells.TSV"])
        .unwrap();
    let config = config_from_arguments(matches.subcommand_matches("evaluate").unwrap()).unwrap();
    assert_eq!(config.loader.delimiter, '\t');

    let csv = config_from_arguments(&evaluate_matches(&[])).unwrap();
    assert_eq!(csv.loader.delimiter, ',');
}

#[test]
fn tsv_input_keeps_configured_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"loader": {"delimiter": ";"}}"#).unwrap();

    let matches = build_cli()
        .try_get_matches_from(["cellsight", "evaluate", "cells.tsv", path.to_str().unwrap()])
        .unwrap();
    let config = config_from_arguments(matches.subcommand_matches("evaluate").unwrap()).unwrap();
    assert_eq!(config.loader.delimiter, ';');
}

#[test]
fn delimiter_from_extension() {
    use std::path::Path;
    assert_eq!(delimiter_for_path(Path::new("a.tsv")), Some('\t'));
    assert_eq!(delimiter_for_path(Path::new("a.csv")), None);
    assert_eq!(delimiter_for_path(Path::new("a.txt")), None);
}

#[test]
fn config_file_with_unknown_key_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"k_maxx": 10}"#).unwrap();
    let err = load_pipeline_config(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("k_maxx"));
}
