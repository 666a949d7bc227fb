//! Error types for the uptake library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for uptake operations.
#[derive(Debug, Error)]
pub enum UptakeError {
    /// The table or an argument is malformed (ragged rows, duplicate headers,
    /// mask length mismatch, out-of-range threshold).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A column required by the operation does not exist in the table.
    #[error("Missing column: '{column}'")]
    MissingColumn { column: String },

    /// A whole-table rate was requested over zero rows.
    #[error("Degenerate aggregation: {0}")]
    DegenerateAggregation(String),

    /// A target cell could not be read as an accepted/declined indicator.
    #[error("Invalid target value in column '{column}' at row {row}: {value}")]
    InvalidTargetValue {
        column: String,
        row: usize,
        value: String,
    },

    /// A missing-data strategy name was not recognized.
    #[error("Unknown strategy: '{0}' (expected report, drop_columns, drop_rows or fill)")]
    UnknownStrategy(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UptakeError {
    /// Shorthand for a [`UptakeError::MissingColumn`].
    pub fn missing_column(column: impl Into<String>) -> Self {
        UptakeError::MissingColumn {
            column: column.into(),
        }
    }
}

/// Result type alias for uptake operations.
pub type Result<T> = std::result::Result<T, UptakeError>;
