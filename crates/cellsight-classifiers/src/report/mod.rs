//! Plain-text reporting of a pipeline run.
//!
//! `report` holds the generic section/report containers; `summary` turns a
//! `PipelineSummary` into the standard analysis report.
#[allow(clippy::module_inception)]
pub mod report;
pub mod summary;

pub use report::{Report, ReportSection};
pub use summary::build_report;
