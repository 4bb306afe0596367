//! The per-item `contents` manifest.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PackagerError, Result};

/// Name of the manifest file inside an item directory.
pub const CONTENTS_FILE: &str = "contents";

/// Name of the license document inside an item directory.
pub const LICENSE_FILE: &str = "license.txt";

/// Bundle marker for the license line.
pub const LICENSE_BUNDLE: &str = "BUNDLE:LICENSE";

/// One line of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentsEntry {
    /// Name of the file inside the item directory.
    pub filename: String,
    /// Tab-separated tokens following the name.
    pub params: Vec<String>,
}

impl ContentsEntry {
    /// Create an entry.
    pub fn new(filename: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            filename: filename.into(),
            params,
        }
    }

    /// The license bundle marker line.
    pub fn license() -> Self {
        Self::new(LICENSE_FILE, vec![LICENSE_BUNDLE.to_string()])
    }

    /// Returns true for the license bundle marker.
    pub fn is_license(&self) -> bool {
        self.filename == LICENSE_FILE && self.params.iter().any(|p| p == LICENSE_BUNDLE)
    }

    /// Render as `name<TAB>param<TAB>param`.
    pub fn line(&self) -> String {
        let mut line = self.filename.clone();
        for param in &self.params {
            line.push('\t');
            line.push_str(param);
        }
        line
    }
}

/// Writes manifest lines as files are placed.
pub struct ContentsWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    entries: Vec<ContentsEntry>,
}

impl ContentsWriter {
    /// Create an empty manifest in `dir`.
    pub fn create(dir: &Path) -> Result<Self> {
        let path = dir.join(CONTENTS_FILE);
        let file = File::create(&path).map_err(|e| PackagerError::io(&path, e))?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            entries: Vec::new(),
        })
    }

    /// Append one line.
    pub fn add(&mut self, entry: ContentsEntry) -> Result<()> {
        writeln!(self.writer, "{}", entry.line()).map_err(|e| PackagerError::io(&self.path, e))?;
        self.entries.push(entry);
        Ok(())
    }

    /// Append the license bundle marker line.
    pub fn add_license_marker(&mut self) -> Result<()> {
        self.add(ContentsEntry::license())
    }

    /// Flush the manifest and return its lines.
    pub fn close(mut self) -> Result<Vec<ContentsEntry>> {
        self.writer.flush().map_err(|e| PackagerError::io(&self.path, e))?;
        Ok(self.entries)
    }
}
