//! The in-memory metadata table and its provenance.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the loaded CSV file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSource {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the raw file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Encoding the bytes were decoded with.
    pub encoding: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the table was loaded. Not serialized, so reports of the same
    /// table compare equal.
    #[serde(skip)]
    pub loaded_at: DateTime<Utc>,
}

impl TableSource {
    /// Describe a file that has just been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        encoding: impl Into<String>,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            encoding: encoding.into(),
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// A fully loaded metadata table.
///
/// Rows are aligned positionally to `headers` and always have exactly
/// `headers.len()` cells. The table is never mutated after loading, so the
/// verify and materialize passes can each scan it from the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTable {
    /// Column headers, in file order.
    pub headers: Vec<String>,
    /// Data rows (header excluded).
    pub rows: Vec<Vec<String>>,
}

impl MetadataTable {
    /// Create a table, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Iterate rows together with their 1-based ordinal.
    pub fn numbered_rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (idx + 1, row.as_slice()))
    }
}
