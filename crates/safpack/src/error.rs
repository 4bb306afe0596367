//! Error types for the safpack library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for packaging operations.
///
/// Validation findings (invalid headers, missing files) are not errors; they
/// accumulate in [`crate::ValidationFindings`] and gate materialization.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// Error reading or writing a file or directory.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The metadata table could not be read as a table.
    #[error("Malformed metadata table: {0}")]
    MalformedTable(String),

    /// A single row could not be turned into an item.
    #[error("Row {row}: {message}")]
    RowMaterialization { row: usize, message: String },

    /// A filegroup archive could not be opened or expanded.
    #[error("Filegroup '{path}': {message}")]
    Filegroup { path: PathBuf, message: String },

    /// The collection registry could not be reached or returned garbage.
    #[error("Collection registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// A collection identifier is not known to the registry.
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// Compressing the finished package failed.
    #[error("Archive error: {0}")]
    Archive(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PackagerError {
    /// Wrap an IO error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PackagerError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for packaging operations.
pub type Result<T> = std::result::Result<T, PackagerError>;
