//! Compression of a finished package into a single zip file.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::error::{PackagerError, Result};

/// Zip everything under `root` into `archive_path`.
///
/// Entry names are relative to `root` with `/` separators. Symbolic links
/// are followed so linked content is stored. `archive_path` may live inside
/// `root`; it is skipped. Returns the number of entries written.
pub fn compress_dir(root: &Path, archive_path: &Path) -> Result<usize> {
    let archive_err = |e: &dyn std::fmt::Display| {
        PackagerError::Archive(format!("{}: {}", archive_path.display(), e))
    };

    let file = File::create(archive_path).map_err(|e| PackagerError::io(archive_path, e))?;
    let mut zip = zip::ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0;
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| archive_err(&e))?;
        let path = entry.path();
        if path == archive_path {
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            zip.add_directory(name, options).map_err(|e| archive_err(&e))?;
        } else {
            zip.start_file(name.as_str(), options).map_err(|e| archive_err(&e))?;
            let mut reader = BufReader::new(File::open(path).map_err(|e| PackagerError::io(path, e))?);
            io::copy(&mut reader, &mut zip).map_err(|e| PackagerError::io(path, e))?;
            debug!(entry = %name, "compressed");
        }
        entries += 1;
    }

    zip.finish().map_err(|e| archive_err(&e))?;
    info!(archive = %archive_path.display(), entries, "package compressed");
    Ok(entries)
}
