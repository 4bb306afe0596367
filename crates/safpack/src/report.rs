//! Run reports.
//!
//! A [`Report`] is the single channel for everything a run found. It renders
//! as ordered text lines (see [`Report::lines`]) and serializes to JSON for
//! callers that want structured findings.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::TableSource;
use crate::package::RowOutcome;
use crate::validation::ValidationFindings;

/// Which public operation produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Verify,
    Process,
}

/// Result of compressing the finished package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ArchiveOutcome {
    /// The archive was written.
    Written { path: PathBuf, entries: usize },
    /// Compression failed; the package directory is unaffected.
    Failed { message: String },
}

/// Everything a verify or process run found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub mode: RunMode,
    /// File name of the metadata table.
    pub table: String,
    /// Name of the content source directory.
    pub source_dir: String,
    /// Provenance of the loaded table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_source: Option<TableSource>,
    pub findings: ValidationFindings,
    /// Source entries no row referenced, in directory order.
    pub unused_files: Vec<String>,
    /// True when critical findings blocked a process run.
    pub materialization_skipped: bool,
    /// One outcome per materialized row.
    pub items: Vec<RowOutcome>,
    /// Output entries left by an earlier run that were removed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stale_removed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveOutcome>,
}

impl Report {
    /// Returns true if any header or file finding is critical.
    pub fn has_critical_errors(&self) -> bool {
        self.findings.has_critical()
    }

    /// Rows that failed while being materialized.
    pub fn failed_items(&self) -> impl Iterator<Item = &RowOutcome> {
        self.items.iter().filter(|o| !o.is_ok())
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the report as text lines.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if self.has_critical_errors() {
            lines.push(match self.mode {
                RunMode::Process => "At least one critical error -- BATCH NOT CREATED".to_string(),
                RunMode::Verify => "At least one critical error -- BATCH WOULD NOT BE CREATED".to_string(),
            });
        }

        self.header_lines(&mut lines);
        self.file_lines(&mut lines);
        if self.mode == RunMode::Process && !self.materialization_skipped {
            self.item_lines(&mut lines);
        }
        if let Some(archive) = &self.archive {
            lines.push(match archive {
                ArchiveOutcome::Written { path, entries } => {
                    format!("[OK] Package compressed to {} ({} entries).", path.display(), entries)
                }
                ArchiveOutcome::Failed { message } => {
                    format!("[ERROR] Compressing the package failed: {}", message)
                }
            });
        }

        lines
    }

    fn header_lines(&self, lines: &mut Vec<String>) {
        banner(lines, "Headers");

        if let Some(source) = &self.table_source {
            lines.push(format!(
                "[INFO] Read {} ({} row(s), {} column(s), {}, {}).",
                source.file, source.row_count, source.column_count, source.encoding, source.hash
            ));
        }

        let invalid = &self.findings.invalid_headers;
        if invalid.is_empty() {
            lines.push("[OK] All headers in metadata csv are valid headers.".to_string());
        } else {
            lines.push(format!(
                "[CRITICAL ERROR] The following {} invalid header(s) found:",
                invalid.len()
            ));
            lines.extend(invalid.iter().map(|h| format!("\t{}", h)));
        }

        let missing = &self.findings.missing_required_headers;
        if missing.is_empty() {
            lines.push("[OK] All required headers were found.".to_string());
        } else {
            lines.push(format!(
                "[CRITICAL ERROR] The following {} required headers were not found in the metadata csv:",
                missing.len()
            ));
            lines.extend(missing.iter().map(|h| format!("\t{}", h)));
        }
    }

    fn file_lines(&self, lines: &mut Vec<String>) {
        banner(lines, "Files");

        let unresolved = &self.findings.unresolved_files;
        if unresolved.is_empty() {
            lines.push(
                "[OK] All filenames found in the metadata csv were found in content source directory."
                    .to_string(),
            );
        } else {
            lines.push(
                "[CRITICAL ERROR] Filenames referred to in the csv that are not found will prevent the batch from being created."
                    .to_string(),
            );
            lines.push(format!(
                "The following {} filename(s) were found in the metadata CSV, but were NOT found in the content source directory:",
                unresolved.len()
            ));
            lines.extend(
                unresolved
                    .iter()
                    .map(|f| format!("\t{} (row {}, column {})", f.filename, f.row, f.column)),
            );
        }

        if self.unused_files.is_empty() {
            lines.push(format!(
                "[OK] All filenames found in content source directory {} were found in metadata csv {}.",
                self.source_dir, self.table
            ));
        } else {
            lines.push(
                "[INFO] Extra filenames in the source directory will not cause an error, but may indicate an oversight."
                    .to_string(),
            );
            lines.push(format!(
                "[INFO] The following {} filename(s) were found in the content source directory that were not found in the metadata CSV:",
                self.unused_files.len()
            ));
            lines.extend(self.unused_files.iter().map(|f| format!("\t{}", f)));
        }
    }

    fn item_lines(&self, lines: &mut Vec<String>) {
        banner(lines, "Items");

        let written = self.items.iter().filter(|o| o.is_ok()).count();
        lines.push(format!("[OK] {} of {} item(s) written.", written, self.items.len()));

        if !self.stale_removed.is_empty() {
            lines.push(format!(
                "[INFO] Removed {} entry(ies) left in the output directory by an earlier run:",
                self.stale_removed.len()
            ));
            lines.extend(self.stale_removed.iter().map(|name| format!("\t{}", name)));
        }

        for outcome in &self.items {
            if let Some(error) = &outcome.error {
                lines.push(format!("[ERROR] Row {} ({}): {}", outcome.row, outcome.directory, error));
            }
            for note in &outcome.notes {
                lines.push(format!("[INFO] Row {}: {}", outcome.row, note));
            }
        }
    }
}

fn banner(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push("#######".to_string());
    lines.push(format!("# {}", title));
    lines.push("#######".to_string());
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Assembles a [`Report`] as a run progresses.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    report: Report,
}

impl ReportBuilder {
    /// Start a report for a run over `table` and `source_dir`.
    pub fn new(mode: RunMode, table: impl Into<String>, source_dir: impl Into<String>) -> Self {
        Self {
            report: Report {
                mode,
                table: table.into(),
                source_dir: source_dir.into(),
                table_source: None,
                findings: ValidationFindings::new(),
                unused_files: Vec::new(),
                materialization_skipped: false,
                items: Vec::new(),
                stale_removed: Vec::new(),
                archive: None,
            },
        }
    }

    pub fn table_source(mut self, source: TableSource) -> Self {
        self.report.table_source = Some(source);
        self
    }

    pub fn findings(mut self, findings: ValidationFindings) -> Self {
        self.report.findings = findings;
        self
    }

    pub fn unused_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.report.unused_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn materialization_skipped(mut self, skipped: bool) -> Self {
        self.report.materialization_skipped = skipped;
        self
    }

    pub fn items(mut self, items: Vec<RowOutcome>) -> Self {
        self.report.items = items;
        self
    }

    pub fn stale_removed(mut self, names: Vec<String>) -> Self {
        self.report.stale_removed = names;
        self
    }

    pub fn archive(mut self, archive: ArchiveOutcome) -> Self {
        self.report.archive = Some(archive);
        self
    }

    /// Returns true if the findings so far are critical.
    pub fn has_critical_errors(&self) -> bool {
        self.report.has_critical_errors()
    }

    pub fn build(self) -> Report {
        self.report
    }
}
