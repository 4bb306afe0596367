//! Starter metadata table generation.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{PackagerError, Result};

/// Header row of a generated starter table.
pub const STARTER_HEADERS: [&str; 6] = [
    "filename",
    "dc.title",
    "dc.contributor.author",
    "dc.date.issued",
    "dc.description.abstract",
    "dc.subject",
];

/// Write a starter table at `csv_path` with one row per file in `source_dir`.
///
/// Dot-files, blank names and the table itself are skipped. Rows follow
/// sorted directory order. Returns the number of rows written.
pub fn generate_manifest(source_dir: impl AsRef<Path>, csv_path: impl AsRef<Path>) -> Result<usize> {
    let source_dir = source_dir.as_ref();
    let csv_path = csv_path.as_ref();
    let own_name = csv_path.file_name().map(|n| n.to_string_lossy().into_owned());

    let mut names = Vec::new();
    for entry in fs::read_dir(source_dir).map_err(|e| PackagerError::io(source_dir, e))? {
        let entry = entry.map_err(|e| PackagerError::io(source_dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if name.trim().is_empty() || name.starts_with('.') || own_name.as_deref() == Some(name.as_str()) {
            debug!(file = %name, "skipped");
            continue;
        }
        names.push(name);
    }
    names.sort();

    let mut writer = csv::Writer::from_path(csv_path)?;
    writer.write_record(STARTER_HEADERS)?;
    for name in &names {
        let mut record = vec![name.as_str()];
        record.resize(STARTER_HEADERS.len(), "");
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|e| PackagerError::io(csv_path, e))?;

    info!(table = %csv_path.display(), rows = names.len(), "starter table written");
    Ok(names.len())
}
