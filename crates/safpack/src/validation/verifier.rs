//! Dry-run pass resolving file references against the source directory.

use tracing::info;

use crate::input::{FileSpec, MetadataTable, split_values};
use crate::inventory::SourceInventory;
use crate::schema::TableLayout;

use super::findings::ValidationFindings;

/// Checks every file reference in a table without touching the output.
pub struct RowVerifier<'a> {
    layout: &'a TableLayout,
}

impl<'a> RowVerifier<'a> {
    /// Create a verifier for a classified table.
    pub fn new(layout: &'a TableLayout) -> Self {
        Self { layout }
    }

    /// Resolve every referenced file, recording the ones that are missing.
    ///
    /// Filegroup archives are looked up by name; their contents are not
    /// inspected.
    pub fn verify(
        &self,
        table: &MetadataTable,
        inventory: &mut SourceInventory,
        findings: &mut ValidationFindings,
    ) {
        let before = findings.unresolved_files.len();

        for (ordinal, row) in table.numbered_rows() {
            for column in self.layout.file_columns() {
                let Some(cell) = row.get(column.position) else {
                    continue;
                };
                if cell.is_empty() {
                    continue;
                }

                for value in split_values(cell) {
                    let spec = FileSpec::parse(value);
                    if spec.name.is_empty() {
                        continue;
                    }
                    if !inventory.resolve(&spec.name) {
                        findings.add_unresolved(ordinal, &column.name, &spec.name);
                    }
                }
            }
        }

        info!(
            rows = table.row_count(),
            unresolved = findings.unresolved_files.len() - before,
            "verified file references"
        );
    }
}
