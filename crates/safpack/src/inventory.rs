//! Listing of the content source directory with per-file hit counts.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{PackagerError, Result};

/// Filenames in the source directory and how often the table referenced them.
///
/// Matching is exact string equality on the name; no case folding and no
/// path awareness.
#[derive(Debug, Clone, Default)]
pub struct SourceInventory {
    root: PathBuf,
    hits: IndexMap<String, usize>,
}

impl SourceInventory {
    /// List the direct entries of `dir`, sorted by name, all with zero hits.
    pub fn scan(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| PackagerError::io(dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PackagerError::io(dir, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();

        debug!(dir = %dir.display(), files = names.len(), "scanned source directory");

        Ok(Self::from_names(dir, names))
    }

    /// Build an inventory from a known list of names.
    pub fn from_names<I, S>(root: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            hits: names.into_iter().map(|n| (n.into(), 0)).collect(),
        }
    }

    /// The scanned directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a filename; a hit increments its counter.
    pub fn resolve(&mut self, filename: &str) -> bool {
        match self.hits.get_mut(filename) {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    /// Check for a filename without counting it.
    pub fn contains(&self, filename: &str) -> bool {
        self.hits.contains_key(filename)
    }

    /// Number of times a filename has been resolved.
    pub fn hits(&self, filename: &str) -> Option<usize> {
        self.hits.get(filename).copied()
    }

    /// Filenames that no row has referenced.
    pub fn unused(&self) -> Vec<&str> {
        self.hits
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Number of entries in the directory.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns true if the directory was empty.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
