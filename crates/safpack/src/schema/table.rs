//! Table-level column layout.

use serde::{Deserialize, Serialize};

use super::column::ColumnSpec;
use super::types::ColumnRole;

/// Classified columns for an entire table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableLayout {
    /// One entry per header, in header order.
    pub columns: Vec<ColumnSpec>,
}

impl TableLayout {
    /// Classify every header of a table.
    pub fn from_headers(headers: &[String]) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(position, name)| ColumnSpec::new(name.as_str(), position))
            .collect();

        Self { columns }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns whose cells are checked against the source directory.
    pub fn file_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns
            .iter()
            .filter(|c| c.role.is_file_reference() || matches!(c.role, ColumnRole::FileGroup { .. }))
    }
}
