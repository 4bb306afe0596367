//! Turns table rows into item directories.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{PackagerError, Result};
use crate::input::{FileSpec, MetadataTable, split_values};
use crate::inventory::SourceInventory;
use crate::schema::{ColumnRole, TableLayout};

use super::collections::CollectionLinker;
use super::contents::ContentsEntry;
use super::filegroup::FilegroupExpander;
use super::item::{Item, ItemSummary, is_reserved_name};

/// How referenced files get into an item directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Copy the file.
    #[default]
    Copy,
    /// Symbolic link to the canonical source path.
    Symlink,
}

/// What happened to one row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowOutcome {
    /// 1-based row ordinal.
    pub row: usize,
    /// Item directory name.
    pub directory: String,
    pub files_placed: usize,
    pub fields_written: usize,
    pub collections: usize,
    /// Non-fatal problems, in the order they occurred.
    pub notes: Vec<String>,
    /// Set when the row failed; the directory may be incomplete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RowOutcome {
    fn new(row: usize) -> Self {
        Self {
            row,
            directory: Item::dir_name(row),
            ..Self::default()
        }
    }

    /// Returns true if the row produced a complete item.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The row's failure as an error value.
    pub fn failure(&self) -> Option<PackagerError> {
        self.error.as_ref().map(|message| PackagerError::RowMaterialization {
            row: self.row,
            message: message.clone(),
        })
    }

    fn absorb(&mut self, summary: &ItemSummary) {
        self.files_placed = summary.files_placed();
        self.fields_written = summary.fields_written();
        self.collections = summary.collections.len();
    }
}

/// Writes one item directory per table row.
pub struct RowMaterializer<'a> {
    layout: &'a TableLayout,
    source_dir: &'a Path,
    output_dir: &'a Path,
    placement: Placement,
    license_text: &'a str,
}

impl<'a> RowMaterializer<'a> {
    /// Create a materializer writing into `output_dir`.
    pub fn new(layout: &'a TableLayout, source_dir: &'a Path, output_dir: &'a Path) -> Self {
        Self {
            layout,
            source_dir,
            output_dir,
            placement: Placement::default(),
            license_text: "",
        }
    }

    /// Set how files are placed.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the text written to every `license.txt`.
    pub fn with_license_text(mut self, text: &'a str) -> Self {
        self.license_text = text;
        self
    }

    /// Materialize every row in table order.
    ///
    /// A failing row is recorded in its outcome and does not stop the rest.
    pub fn materialize(
        &self,
        table: &MetadataTable,
        inventory: &mut SourceInventory,
        linker: &mut CollectionLinker,
    ) -> Vec<RowOutcome> {
        let outcomes: Vec<RowOutcome> = table
            .numbered_rows()
            .map(|(ordinal, row)| self.materialize_row(ordinal, row, inventory, linker))
            .collect();

        info!(
            items = outcomes.len(),
            failed = outcomes.iter().filter(|o| !o.is_ok()).count(),
            "materialized rows"
        );
        outcomes
    }

    /// Build the item for a single row.
    pub fn materialize_row(
        &self,
        ordinal: usize,
        row: &[String],
        inventory: &mut SourceInventory,
        linker: &mut CollectionLinker,
    ) -> RowOutcome {
        let mut outcome = RowOutcome::new(ordinal);

        let mut item = match Item::create(self.output_dir, ordinal, self.license_text) {
            Ok(item) => item,
            Err(e) => {
                warn!(row = ordinal, error = %e, "could not create item");
                outcome.error = Some(e.to_string());
                return outcome;
            }
        };

        let filled = self.fill_item(&mut item, row, inventory, linker, &mut outcome.notes);
        let finished = item.finish();
        if let Ok(summary) = &finished {
            outcome.absorb(summary);
        }

        if let Err(e) = filled.and(finished.map(|_| ())) {
            warn!(row = ordinal, error = %e, "row failed");
            outcome.error = Some(e.to_string());
        }
        outcome
    }

    fn fill_item(
        &self,
        item: &mut Item,
        row: &[String],
        inventory: &mut SourceInventory,
        linker: &mut CollectionLinker,
        notes: &mut Vec<String>,
    ) -> Result<()> {
        for column in &self.layout.columns {
            let Some(cell) = row.get(column.position) else {
                continue;
            };
            if cell.trim().is_empty() {
                continue;
            }

            match &column.role {
                ColumnRole::FileReference | ColumnRole::FileReferenceWithParameters { .. } => {
                    self.place_files(item, cell, column.role.params(), inventory, notes)?;
                }
                ColumnRole::FileGroup { params } => {
                    self.expand_filegroups(item, cell, params, inventory, notes)?;
                }
                ColumnRole::CollectionMembership => {
                    linker.link(item, cell, notes)?;
                }
                ColumnRole::SchemaField { schema, element } => {
                    for value in split_values(cell) {
                        item.document(schema)?.write_field(element, value)?;
                    }
                }
                ColumnRole::Unrecognized => {}
            }
        }
        Ok(())
    }

    /// Place every file named in a cell, with a manifest line and a license
    /// marker line for each.
    fn place_files(
        &self,
        item: &mut Item,
        cell: &str,
        column_params: &str,
        inventory: &mut SourceInventory,
        notes: &mut Vec<String>,
    ) -> Result<usize> {
        let mut placed = 0;

        for value in split_values(cell) {
            let spec = FileSpec::parse(value);
            if spec.name.is_empty() {
                continue;
            }
            if !inventory.resolve(&spec.name) {
                warn!(row = item.ordinal(), file = %spec.name, "file not found in source directory");
                notes.push(format!("'{}' not found in source directory", spec.name));
                continue;
            }

            let placed_name = spec.placed_name();
            if is_reserved_name(placed_name) {
                warn!(row = item.ordinal(), file = %spec.name, "file name is reserved for an item file");
                notes.push(format!("'{}' skipped: '{}' is an item file name", spec.name, placed_name));
                continue;
            }

            let source = self.source_dir.join(&spec.name);
            let target = item.dir().join(placed_name);
            self.place(&source, &target)?;
            debug!(row = item.ordinal(), file = placed_name, "placed file");

            let contents = item.contents_mut();
            contents.add(ContentsEntry::new(placed_name, spec.manifest_params(column_params)))?;
            contents.add_license_marker()?;
            placed += 1;
        }

        Ok(placed)
    }

    fn expand_filegroups(
        &self,
        item: &mut Item,
        cell: &str,
        params: &str,
        inventory: &mut SourceInventory,
        notes: &mut Vec<String>,
    ) -> Result<usize> {
        let expander = FilegroupExpander::new(self.source_dir);
        let mut placed = 0;

        for archive in split_values(cell) {
            if !inventory.resolve(archive) {
                warn!(row = item.ordinal(), archive, "filegroup not found in source directory");
                notes.push(format!("filegroup '{}' not found in source directory", archive));
                continue;
            }
            placed += expander.expand(archive, item, params, inventory, notes)?;
        }

        Ok(placed)
    }

    fn place(&self, source: &Path, target: &Path) -> Result<()> {
        match self.placement {
            Placement::Copy => {
                fs::copy(source, target).map_err(|e| PackagerError::io(source, e))?;
            }
            Placement::Symlink => {
                let canonical = fs::canonicalize(source).map_err(|e| PackagerError::io(source, e))?;
                symlink(&canonical, target).map_err(|e| PackagerError::io(target, e))?;
            }
        }
        Ok(())
    }
}

#[cfg(unix)]
fn symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(windows)]
fn symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(source, target)
}
