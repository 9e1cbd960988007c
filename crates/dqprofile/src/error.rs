//! Error types for the dqprofile library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for profiling operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Error reading, writing or moving a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Empty file or no header to read columns from.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Two columns share the same name.
    #[error("Duplicate column name: '{0}'")]
    DuplicateColumn(String),

    /// A column does not have as many values as the dataset has rows.
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A column referenced by name does not exist.
    #[error("Column not found: '{0}'")]
    ColumnNotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProfileError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProfileError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for profiling operations.
pub type Result<T> = std::result::Result<T, ProfileError>;
