//! Command-line definition, shared by the binary and the tests.
use std::path::PathBuf;

use clap::{Arg, Command, ValueHint};

pub fn build_cli() -> Command {
    Command::new("cellsight")
        .version(clap::crate_version!())
        .about("KNN diagnostic analysis of tabular cell measurements")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("evaluate")
                .about("Scale, split, classify and evaluate a diagnostic CSV table")
                .arg(
                    Arg::new("data")
                        .help("Path to the input table (header row, id, label, numeric features)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .help("Path to a JSON configuration file. Defaults are used when omitted.")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("k")
                        .short('k')
                        .long("k")
                        .help("K for the headline confusion matrix. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("k_min")
                        .long("k-min")
                        .help("First K of the sweep.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("k_max")
                        .long("k-max")
                        .help("Last K of the sweep.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("scaling")
                        .short('s')
                        .long("scaling")
                        .help("Feature scaling method.")
                        .value_parser(["none", "normalize", "standardize"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("split_ratio")
                        .short('r')
                        .long("split-ratio")
                        .help("Expected fraction of rows assigned to the training set.")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed of the train/test split.")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("tolerance")
                        .long("tolerance")
                        .help("Relative odds-ratio tolerance used when selecting K.")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("positive_label")
                        .long("positive-label")
                        .help("Label value treated as the positive class.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path to write the text report. Defaults to stdout.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("json_file")
                        .long("json")
                        .help("Also write the run summary as JSON to this path.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("template").about("Print the default configuration as JSON"),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
}
