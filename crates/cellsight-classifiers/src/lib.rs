//! cellsight-classifiers: K-nearest-neighbour analysis of tabular diagnostic data.
//!
//! The crate covers the whole analysis as small, testable stages: loading a
//! diagnostic CSV (`io`), per-feature scaling (`preprocessing`), seeded
//! train/test splitting (`data_handling`), the KNN classifier (`models`),
//! confusion-matrix metrics (`stats`), the K sweep (`sweep`) and a plain-text
//! report (`report`). `pipeline` chains them for a single run.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod report;
pub mod stats;
pub mod sweep;

pub use error::{CellsightError, Result};
