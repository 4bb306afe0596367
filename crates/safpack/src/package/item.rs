//! One deposit item: the directory built from a single table row.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};

use crate::error::{PackagerError, Result};

use super::contents::{CONTENTS_FILE, ContentsEntry, ContentsWriter, LICENSE_FILE};
use super::document::{DC_SCHEMA, MetadataDocument};

/// Name of the collection membership file inside an item directory.
pub const COLLECTIONS_FILE: &str = "collections";

/// Returns true if `name` is a file the item itself writes.
///
/// Content files with these names would replace the item's own manifest,
/// license, collections or metadata documents.
pub fn is_reserved_name(name: &str) -> bool {
    matches!(name, CONTENTS_FILE | LICENSE_FILE | COLLECTIONS_FILE | "dublin_core.xml")
        || (name.starts_with("metadata_") && name.ends_with(".xml"))
}

/// An item being materialized.
///
/// Holds the open manifest and one open document per schema seen so far.
/// Nothing is finalized until [`Item::finish`].
pub struct Item {
    ordinal: usize,
    dir: PathBuf,
    contents: ContentsWriter,
    documents: IndexMap<String, MetadataDocument>,
    collections: Vec<String>,
}

impl Item {
    /// Directory name for a row ordinal.
    pub fn dir_name(ordinal: usize) -> String {
        format!("item_{}", ordinal)
    }

    /// Create `item_<ordinal>/` with its license, manifest and `dc` document.
    ///
    /// Whatever an earlier run left in the directory is removed first.
    pub fn create(output_dir: &Path, ordinal: usize, license_text: &str) -> Result<Self> {
        let dir = output_dir.join(Self::dir_name(ordinal));
        if fs::symlink_metadata(&dir).is_ok_and(|meta| meta.is_dir()) {
            fs::remove_dir_all(&dir).map_err(|e| PackagerError::io(&dir, e))?;
        }
        fs::create_dir_all(&dir).map_err(|e| PackagerError::io(&dir, e))?;

        let license_path = dir.join(LICENSE_FILE);
        fs::write(&license_path, license_text).map_err(|e| PackagerError::io(&license_path, e))?;

        let contents = ContentsWriter::create(&dir)?;
        let mut documents = IndexMap::new();
        documents.insert(DC_SCHEMA.to_string(), MetadataDocument::create(&dir, DC_SCHEMA)?);

        Ok(Self {
            ordinal,
            dir,
            contents,
            documents,
            collections: Vec::new(),
        })
    }

    /// 1-based row ordinal.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// The item directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The open manifest.
    pub fn contents_mut(&mut self) -> &mut ContentsWriter {
        &mut self.contents
    }

    /// The document for `schema`, opened on first use.
    pub fn document(&mut self, schema: &str) -> Result<&mut MetadataDocument> {
        match self.documents.entry(schema.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let document = MetadataDocument::create(&self.dir, schema)?;
                Ok(entry.insert(document))
            }
        }
    }

    /// Append a handle to the `collections` file.
    pub fn add_collection(&mut self, handle: &str) -> Result<()> {
        let path = self.dir.join(COLLECTIONS_FILE);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| PackagerError::io(&path, e))?;
        writeln!(file, "{}", handle).map_err(|e| PackagerError::io(&path, e))?;

        self.collections.push(handle.to_string());
        Ok(())
    }

    /// Close the manifest and every document.
    ///
    /// Every writer is closed even if an earlier one fails; the first error
    /// is returned.
    pub fn finish(self) -> Result<ItemSummary> {
        let Item {
            ordinal,
            dir,
            contents,
            documents,
            collections,
        } = self;

        let mut first_error = None;

        let entries = match contents.close() {
            Ok(entries) => entries,
            Err(e) => {
                first_error = Some(e);
                Vec::new()
            }
        };

        let mut fields = Vec::with_capacity(documents.len());
        for (schema, document) in documents {
            match document.close() {
                Ok(count) => fields.push((schema, count)),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(ItemSummary {
                ordinal,
                dir,
                contents: entries,
                fields,
                collections,
            }),
        }
    }
}

/// What was written for a finished item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSummary {
    /// 1-based row ordinal.
    pub ordinal: usize,
    /// The item directory.
    pub dir: PathBuf,
    /// Manifest lines in order.
    pub contents: Vec<ContentsEntry>,
    /// Values written per schema, in the order the documents were opened.
    pub fields: Vec<(String, usize)>,
    /// Collection handles in order.
    pub collections: Vec<String>,
}

impl ItemSummary {
    /// Number of content files (license marker lines excluded).
    pub fn files_placed(&self) -> usize {
        self.contents.iter().filter(|e| !e.is_license()).count()
    }

    /// Total metadata values across all schemas.
    pub fn fields_written(&self) -> usize {
        self.fields.iter().map(|(_, n)| n).sum()
    }
}
