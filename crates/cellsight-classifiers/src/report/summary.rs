use crate::data_handling::{Diagnosis, LabelMapping};
use crate::pipeline::{PipelineSummary, ODDS_RATIO_CONFIDENCE};
use crate::report::report::{Report, ReportSection};
use crate::stats::{ClassBalance, ConfusionMatrix, OddsRatio};

pub const SECTION_INPUT: &str = "Input";
pub const SECTION_BALANCE: &str = "Class proportions";
pub const SECTION_CONFUSION: &str = "Confusion matrix";
pub const SECTION_ODDS: &str = "Odds ratio";
pub const SECTION_SWEEP: &str = "K sweep (ranked by odds ratio)";
pub const SECTION_SELECTION: &str = "Selected K";

/// Build the standard analysis report for one run.
pub fn build_report(summary: &PipelineSummary) -> Report {
    let cfg = &summary.config;
    let mut report = Report::new(
        "KNN diagnostic analysis",
        format!(
            "scaling: {}, split ratio: {}, seed: {}",
            cfg.scaling, cfg.split_ratio, cfg.seed
        ),
    );

    let mut input = ReportSection::new(SECTION_INPUT);
    input.add_content(format!(
        "{} samples, {} features",
        summary.n_samples, summary.n_features
    ));
    input.add_content(format!(
        "positive class: '{}', negative class: '{}'",
        summary.mapping.positive, summary.mapping.negative
    ));
    report.add_section(input);

    let mut balance = ReportSection::new(SECTION_BALANCE);
    balance.add_content(format!(
        "{:<10} {:>6} {:>8} {:>8}",
        "set",
        "n",
        summary.mapping.positive,
        summary.mapping.negative
    ));
    for (name, b) in [
        ("all", &summary.balance),
        ("train", &summary.train_balance),
        ("test", &summary.test_balance),
    ] {
        balance.add_content(balance_row(name, b));
    }
    report.add_section(balance);

    let headline = &summary.headline;
    let mut confusion = ReportSection::new(format!("{} (k = {})", SECTION_CONFUSION, headline.k));
    for line in confusion_table(&headline.confusion, &summary.mapping) {
        confusion.add_content(line);
    }
    confusion.add_content(String::new());
    confusion.add_content(format!(
        "accuracy {}  sensitivity {}  specificity {}  precision {}",
        fmt_rate(headline.confusion.accuracy()),
        fmt_rate(headline.confusion.sensitivity()),
        fmt_rate(headline.confusion.specificity()),
        fmt_rate(headline.confusion.precision())
    ));
    report.add_section(confusion);

    let mut odds = ReportSection::new(SECTION_ODDS);
    odds.add_content(format!("odds ratio: {}", describe_odds_ratio(&headline.odds_ratio)));
    match summary.headline_interval {
        Some((lo, hi)) => odds.add_content(format!(
            "{:.0}% confidence interval: [{:.3}, {:.3}]",
            ODDS_RATIO_CONFIDENCE * 100.0,
            lo,
            hi
        )),
        None => odds.add_content("confidence interval: unavailable (a cell of the matrix is zero)"),
    }
    odds.add_content(format!(
        "false negatives: {}, false positives: {}",
        headline.false_negatives, headline.false_positives
    ));
    report.add_section(odds);

    let mut sweep = ReportSection::new(SECTION_SWEEP);
    sweep.add_content(format!("{:>4} {:>12} {:>5} {:>5}", "k", "odds ratio", "FN", "FP"));
    for result in summary.sweep.ranked() {
        sweep.add_content(format!(
            "{:>4} {:>12} {:>5} {:>5}",
            result.k,
            result.odds_ratio.to_string(),
            result.false_negatives,
            result.false_positives
        ));
    }
    report.add_section(sweep);

    let mut selection = ReportSection::new(SECTION_SELECTION);
    match &summary.selected {
        Some(result) => selection.add_content(format!(
            "k = {} (odds ratio {}, FN {}, FP {}); smallest K within {:.0}% of the best odds ratio",
            result.k,
            result.odds_ratio,
            result.false_negatives,
            result.false_positives,
            cfg.selection_tolerance * 100.0
        )),
        None => selection.add_content("none: no K produced a defined odds ratio"),
    }
    report.add_section(selection);

    report
}

fn balance_row(name: &str, b: &ClassBalance) -> String {
    format!(
        "{:<10} {:>6} {:>8} {:>8}",
        name,
        b.total(),
        fmt_rate(b.proportion(Diagnosis::Positive)),
        fmt_rate(b.proportion(Diagnosis::Negative))
    )
}

/// Rows are predictions, columns are actual labels.
fn confusion_table(cm: &ConfusionMatrix, mapping: &LabelMapping) -> Vec<String> {
    let neg = mapping.symbol(Diagnosis::Negative);
    let pos = mapping.symbol(Diagnosis::Positive);
    vec![
        format!(
            "{:<14} {:>10} {:>10}",
            "",
            format!("actual {}", neg),
            format!("actual {}", pos)
        ),
        format!(
            "{:<14} {:>10} {:>10}",
            format!("predicted {}", neg),
            cm.true_negative,
            cm.false_negative
        ),
        format!(
            "{:<14} {:>10} {:>10}",
            format!("predicted {}", pos),
            cm.false_positive,
            cm.true_positive
        ),
    ]
}

fn describe_odds_ratio(or: &OddsRatio) -> String {
    match or {
        OddsRatio::Defined(v) => format!("{:.3}", v),
        OddsRatio::Undefined => "undefined (no false negatives or no false positives)".to_string(),
    }
}

fn fmt_rate(rate: Option<f64>) -> String {
    rate.map_or_else(|| "n/a".to_string(), |r| format!("{:.3}", r))
}
