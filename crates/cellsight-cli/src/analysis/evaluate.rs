//! CLI helpers for the `evaluate` subcommand.
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;

use cellsight_classifiers::config::PipelineConfig;
use cellsight_classifiers::io::read_diagnostic_csv;
use cellsight_classifiers::pipeline::{run_pipeline, PipelineSummary};
use cellsight_classifiers::preprocessing::ScalingMethod;
use cellsight_classifiers::report::build_report;

use crate::util::{delimiter_for_path, validate_table_file, write_bytes_to_file};

/// Load a pipeline configuration from a JSON file. Missing keys take their
/// default values.
pub fn load_pipeline_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: PipelineConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

/// Build the run configuration from the optional config file and the
/// command-line overrides of `evaluate`.
pub fn config_from_arguments(matches: &ArgMatches) -> Result<PipelineConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            log::info!("Using config: {}", path.display());
            load_pipeline_config(path)?
        }
        None => {
            log::info!("No config file provided; using defaults");
            PipelineConfig::default()
        }
    };

    // a .tsv input switches the default comma to a tab
    if let Some(data) = matches.get_one::<PathBuf>("data") {
        if let Some(delimiter) = delimiter_for_path(data) {
            if config.loader.delimiter == ',' {
                log::info!("Using tab delimiter for {}", data.display());
                config.loader.delimiter = delimiter;
            }
        }
    }

    if let Some(&k) = matches.get_one::<usize>("k") {
        config.k = k;
    }
    if let Some(&k_min) = matches.get_one::<usize>("k_min") {
        config.k_min = k_min;
    }
    if let Some(&k_max) = matches.get_one::<usize>("k_max") {
        config.k_max = k_max;
    }
    if let Some(scaling) = matches.get_one::<String>("scaling") {
        config.scaling = ScalingMethod::from_str(scaling).map_err(anyhow::Error::msg)?;
    }
    if let Some(&ratio) = matches.get_one::<f64>("split_ratio") {
        config.split_ratio = ratio;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = seed;
    }
    if let Some(&tolerance) = matches.get_one::<f64>("tolerance") {
        config.selection_tolerance = tolerance;
    }
    if let Some(label) = matches.get_one::<String>("positive_label") {
        config.loader.positive_label = label.clone();
    }

    config.validate().context("Invalid configuration")?;
    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Load `data_path` and run the full analysis on it.
pub fn run_evaluate(data_path: &Path, config: &PipelineConfig) -> Result<PipelineSummary> {
    validate_table_file(data_path)?;
    let dataset = read_diagnostic_csv(data_path, &config.loader)
        .with_context(|| format!("Failed to load data: {}", data_path.display()))?;
    let summary = run_pipeline(&dataset, config).context("Analysis failed")?;
    Ok(summary)
}

/// Render the text report to `output`, or to stdout when no path is given.
pub fn write_report(summary: &PipelineSummary, output: Option<&Path>) -> Result<()> {
    let text = build_report(summary).to_string();
    match output {
        Some(path) => {
            write_bytes_to_file(path, text.as_bytes())
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

pub fn write_summary_json(summary: &PipelineSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    write_bytes_to_file(path, json.as_bytes())
        .with_context(|| format!("Failed to write summary: {}", path.display()))?;
    log::info!("Summary written to {}", path.display());
    Ok(())
}
