use anyhow::Result;
use clap::ArgMatches;
use log::LevelFilter;
use std::path::PathBuf;

use cellsight_classifiers::config::PipelineConfig;
use cellsight_cli::analysis::evaluate::{
    config_from_arguments, run_evaluate, write_report, write_summary_json,
};
use cellsight_cli::cli::build_cli;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CELLSIGHT_LOG", "error,cellsight=info"))
        .init();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("evaluate", sub_m)) => handle_evaluate(sub_m),
        Some(("template", _)) => {
            println!("{}", serde_json::to_string_pretty(&PipelineConfig::default())?);
            Ok(())
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_evaluate(matches: &ArgMatches) -> Result<()> {
    let data_path: &PathBuf = matches
        .get_one("data")
        .ok_or_else(|| anyhow::anyhow!("missing data path"))?;
    log::info!("[Cellsight] Evaluating {}", data_path.display());

    let config = config_from_arguments(matches)?;
    let summary = match run_evaluate(data_path, &config) {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("Evaluation failed: {:#}", e);
            std::process::exit(1)
        }
    };

    let output: Option<&PathBuf> = matches.get_one("output_file");
    write_report(&summary, output.map(|p| p.as_path()))?;
    if let Some(json_path) = matches.get_one::<PathBuf>("json_file") {
        write_summary_json(&summary, json_path)?;
    }
    Ok(())
}
