use thiserror::Error;

/// Errors raised by the loading, scaling, classification and evaluation stages.
#[derive(Debug, Error)]
pub enum CellsightError {
    /// The input table does not match the expected schema.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A feature column has zero variance or zero range and cannot be scaled.
    #[error("degenerate feature '{feature}': {reason}")]
    DegenerateFeature { feature: String, reason: String },

    /// A configuration value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Arguments handed to an operation are inconsistent with each other.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CellsightError>;
