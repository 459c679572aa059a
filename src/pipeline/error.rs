//! Error types for the cleaning pipeline.
//!
//! Every variant carries the offending path, line or column so a failed run
//! can be traced back to the input without re-running it.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by loading, profiling, pruning and imputation.
#[derive(Error, Debug)]
pub enum CleanError {
    /// Input file is missing or cannot be read.
    #[error("Cannot access '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file is not well-formed delimited text.
    #[error("Failed to parse '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A referenced column does not exist in the table.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A numeric (or text) operation was requested on a column of another type.
    #[error("Column '{column}' has type {actual}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: String,
    },

    /// A statistic was needed but the column has no present values.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// Configuration values are out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),
}

pub type CleanResult<T> = std::result::Result<T, CleanError>;
