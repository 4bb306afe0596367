//! Findings that gate materialization.

use serde::{Deserialize, Serialize};

/// A file named by a row that is absent from the source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedFile {
    /// 1-based row ordinal.
    pub row: usize,
    /// Header of the column that named the file.
    pub column: String,
    /// The filename as written in the cell.
    pub filename: String,
}

/// Everything the verify pass found wrong with a table.
///
/// Any entry at all is a critical error: the package is not materialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFindings {
    /// Headers outside the recognized vocabulary.
    pub invalid_headers: Vec<String>,
    /// Required headers absent from the table.
    pub missing_required_headers: Vec<String>,
    /// File references that did not resolve.
    pub unresolved_files: Vec<UnresolvedFile>,
}

impl ValidationFindings {
    /// Create an empty set of findings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if materialization must not proceed.
    pub fn has_critical(&self) -> bool {
        !self.invalid_headers.is_empty()
            || !self.missing_required_headers.is_empty()
            || !self.unresolved_files.is_empty()
    }

    /// Total number of findings.
    pub fn len(&self) -> usize {
        self.invalid_headers.len() + self.missing_required_headers.len() + self.unresolved_files.len()
    }

    /// Returns true if nothing was found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record a file reference that did not resolve.
    pub fn add_unresolved(&mut self, row: usize, column: &str, filename: &str) {
        self.unresolved_files.push(UnresolvedFile {
            row,
            column: column.to_string(),
            filename: filename.to_string(),
        });
    }
}
