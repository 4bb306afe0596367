//! Expansion of nested `.tar.gz` archives ("filegroups") into item files.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::{debug, warn};

use crate::error::{PackagerError, Result};
use crate::input::split_params;
use crate::inventory::SourceInventory;

use super::contents::ContentsEntry;
use super::item::{Item, is_reserved_name};

/// Control files that are never placed.
pub const HIDDEN_CONTROL_FILES: &[&str] = &[".htaccess"];

/// Archive depth that is expanded: top-level entries and their children.
const MAX_DEPTH: usize = 2;

/// A file extracted from a filegroup archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroupEntry {
    /// Base name the file is placed under.
    pub base_name: String,
    /// Path inside the archive.
    pub archive_path: String,
    staged: PathBuf,
}

impl FileGroupEntry {
    fn new(base_name: impl Into<String>, archive_path: impl Into<String>, staged: PathBuf) -> Self {
        Self {
            base_name: base_name.into(),
            archive_path: archive_path.into(),
            staged,
        }
    }
}

/// Expands filegroup archives found in the source directory.
pub struct FilegroupExpander<'a> {
    source_dir: &'a Path,
}

impl<'a> FilegroupExpander<'a> {
    /// Create an expander reading archives from `source_dir`.
    pub fn new(source_dir: &'a Path) -> Self {
        Self { source_dir }
    }

    /// Place every file of `archive_name` into the item, in reversed
    /// alphanumeric order, with one manifest line each.
    ///
    /// Entries that would collide with another entry, an item file or a file
    /// already placed are skipped with a note. Returns the number of files
    /// placed.
    pub fn expand(
        &self,
        archive_name: &str,
        item: &mut Item,
        params: &str,
        inventory: &mut SourceInventory,
        notes: &mut Vec<String>,
    ) -> Result<usize> {
        let archive_path = self.source_dir.join(archive_name);

        let staging = tempfile::Builder::new()
            .prefix(".filegroup-")
            .tempdir_in(item.dir())
            .map_err(|e| PackagerError::io(item.dir(), e))?;

        let entries = read_entries(&archive_path, staging.path())?;
        let mut entries = distinct_names(entries, archive_name, notes);
        placement_order(&mut entries);

        let tokens = split_params(params);
        let mut placed = 0;
        for entry in &entries {
            let target = item.dir().join(&entry.base_name);
            if is_reserved_name(&entry.base_name) || fs::symlink_metadata(&target).is_ok() {
                warn!(
                    archive = archive_name,
                    file = %entry.archive_path,
                    item = item.ordinal(),
                    "filegroup entry name already taken in item"
                );
                notes.push(format!(
                    "'{}' in filegroup '{}' skipped: the name '{}' is taken in the item",
                    entry.archive_path, archive_name, entry.base_name
                ));
                continue;
            }

            move_or_copy(&entry.staged, &target)?;
            inventory.resolve(&entry.base_name);

            debug!(
                archive = archive_name,
                file = %entry.archive_path,
                item = item.ordinal(),
                "placed filegroup entry"
            );

            item.contents_mut()
                .add(ContentsEntry::new(entry.base_name.clone(), tokens.clone()))?;
            placed += 1;
        }

        staging
            .close()
            .map_err(|e| PackagerError::io(item.dir(), e))?;

        Ok(placed)
    }
}

/// Keep the first entry for each base name, in archive order.
fn distinct_names(
    entries: Vec<FileGroupEntry>,
    archive_name: &str,
    notes: &mut Vec<String>,
) -> Vec<FileGroupEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| {
            if seen.insert(entry.base_name.clone()) {
                return true;
            }
            notes.push(format!(
                "'{}' in filegroup '{}' skipped: duplicate file name '{}'",
                entry.archive_path, archive_name, entry.base_name
            ));
            false
        })
        .collect()
}

/// Sort entries ascending by alphanumeric base name, then reverse.
pub fn placement_order(entries: &mut [FileGroupEntry]) {
    entries.sort_by(|a, b| alphanum_cmp(&a.base_name, &b.base_name));
    entries.reverse();
}

/// Unpack regular files at most two levels deep into `staging`.
fn read_entries(archive_path: &Path, staging: &Path) -> Result<Vec<FileGroupEntry>> {
    let filegroup_err = |message: String| PackagerError::Filegroup {
        path: archive_path.to_path_buf(),
        message,
    };

    let file = File::open(archive_path).map_err(|e| PackagerError::io(archive_path, e))?;
    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));

    let mut entries = Vec::new();
    for (index, entry) in archive
        .entries()
        .map_err(|e| filegroup_err(e.to_string()))?
        .enumerate()
    {
        let mut entry = entry.map_err(|e| filegroup_err(e.to_string()))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry
            .path()
            .map_err(|e| filegroup_err(e.to_string()))?
            .into_owned();
        let segments: Vec<String> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let Some(base_name) = segments.last().cloned() else {
            continue;
        };
        if segments.len() > MAX_DEPTH || HIDDEN_CONTROL_FILES.contains(&base_name.as_str()) {
            continue;
        }

        let staged = staging.join(format!("{:06}", index));
        entry
            .unpack(&staged)
            .map_err(|e| filegroup_err(format!("{}: {}", segments.join("/"), e)))?;

        entries.push(FileGroupEntry::new(base_name, segments.join("/"), staged));
    }

    Ok(entries)
}

fn move_or_copy(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to).map_err(|e| PackagerError::io(to, e))?;
    Ok(())
}

/// Compare names so that digit runs order by numeric value.
///
/// `img2.jpg` sorts before `img10.jpg`. Non-digit runs compare
/// case-sensitively; equal numbers with different zero padding order the
/// shorter run first.
pub fn alphanum_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks { rest: a };
    let mut right = Chunks { rest: b };

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = compare_chunks(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn compare_chunks(x: &str, y: &str) -> Ordering {
    let numeric = |s: &str| s.starts_with(|c: char| c.is_ascii_digit());
    if !(numeric(x) && numeric(y)) {
        return x.cmp(y);
    }

    let xs = x.trim_start_matches('0');
    let ys = y.trim_start_matches('0');
    xs.len()
        .cmp(&ys.len())
        .then_with(|| xs.cmp(ys))
        .then_with(|| x.len().cmp(&y.len()))
}

/// Maximal runs of ASCII digits or non-digits.
struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());

        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}
