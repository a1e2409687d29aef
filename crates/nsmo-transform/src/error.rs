//! Error types for the preparation stages.

use nsmo_model::{ClassificationIssue, MetadataError};
use thiserror::Error;

/// Errors that abort a preparation run.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransformError {
    /// Column not found in a DataFrame.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Polars DataFrame operation error.
    #[error("DataFrame error: {0}")]
    PolarsError(#[from] polars::error::PolarsError),

    /// A value that must be numeric is not.
    #[error("Non-numeric value '{value}' in column {column} at row {row}")]
    NonNumericValue {
        column: String,
        row: usize,
        value: String,
    },

    /// A yield observation date does not match the configured format.
    #[error("Malformed date '{value}' in column {column} at row {row}")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
    },

    /// The monthly aggregate holds the same (year, month) more than once.
    #[error("Monthly aggregate has duplicate key {year}-{month:02}")]
    JoinAmbiguity { year: i32, month: i32 },

    /// The joined rate column already exists in the survey table.
    #[error("Joined column {0} already exists in the survey table")]
    JoinColumnCollision(String),

    /// Two output columns share a name after `.0` stripping.
    #[error("Encoded column name {name} is produced by both {first} and {second}")]
    NamingCollision {
        name: String,
        first: String,
        second: String,
    },

    /// Columns could not be classified and strict classification is on.
    #[error("{} column(s) could not be classified: {}", .0.len(), describe_issues(.0))]
    Unclassified(Vec<ClassificationIssue>),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] MetadataError),
}

fn describe_issues(issues: &[ClassificationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.column.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for preparation stages.
pub type Result<T> = std::result::Result<T, TransformError>;
