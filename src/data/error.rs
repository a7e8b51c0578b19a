use thiserror::Error;

/// Schema and value problems found while turning input rows into records.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("null value in column '{column}'")]
    NullCell { column: &'static str },

    #[error("'{0}' is not a recognised date")]
    InvalidDate(String),

    #[error("workingday flag must be 0 or 1, got {0}")]
    InvalidWorkingDay(f64),

    #[error("rental count must be non-negative, got {0}")]
    NegativeCount(i64),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}
