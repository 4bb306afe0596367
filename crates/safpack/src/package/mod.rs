//! Materialization of items: directories, manifests, metadata documents and
//! placed files.

mod collections;
mod contents;
mod document;
mod filegroup;
mod item;
mod materializer;

pub use collections::{
    CollectionLinker, CollectionRegistry, DEFAULT_REGISTRY_URL, HttpCollectionRegistry,
    StaticRegistry, default_registry_url,
};
pub use contents::{CONTENTS_FILE, ContentsEntry, ContentsWriter, LICENSE_BUNDLE, LICENSE_FILE};
pub use document::{DC_SCHEMA, MetadataDocument, document_file_name};
pub use filegroup::{FileGroupEntry, FilegroupExpander, HIDDEN_CONTROL_FILES, alphanum_cmp, placement_order};
pub use item::{COLLECTIONS_FILE, Item, ItemSummary, is_reserved_name};
pub use materializer::{Placement, RowMaterializer, RowOutcome};
