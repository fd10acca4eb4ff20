//! IO utilities for loading diagnostic tables.

pub mod diagnostic_csv;

pub use diagnostic_csv::{read_diagnostic_csv, read_diagnostic_csv_from_reader};
