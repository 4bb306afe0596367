//! safpack: builds Simple Archive Format deposit packages.
//!
//! A metadata CSV (one row per deposit item) and a flat directory of content
//! files are turned into a package of `item_<N>/` directories, each holding a
//! `contents` manifest, one metadata document per schema, a license and the
//! item's files.
//!
//! # Workflow
//!
//! - **Verify**: headers are checked against the recognized vocabulary and
//!   every referenced file is looked up in the source directory.
//! - **Process**: if verification found nothing critical, every row is
//!   materialized into an item directory.
//!
//! Both return a [`Report`].
//!
//! # Example
//!
//! ```no_run
//! use safpack::Packager;
//!
//! let packager = Packager::new();
//! let report = packager
//!     .process("metadata.csv", "content/", "package/", false)
//!     .unwrap();
//!
//! for line in report.lines() {
//!     println!("{}", line);
//! }
//! assert!(!report.has_critical_errors());
//! ```

pub mod archive;
pub mod error;
pub mod input;
pub mod inventory;
pub mod manifest;
pub mod package;
pub mod report;
pub mod schema;
pub mod validation;

mod packager;

pub use crate::packager::{Packager, PackagerConfig, DEFAULT_ARCHIVE_NAME, DEFAULT_LICENSE};
pub use error::{PackagerError, Result};
pub use input::{LoaderConfig, MetadataTable, TableLoader, TableSource, split_values};
pub use inventory::SourceInventory;
pub use manifest::generate_manifest;
pub use package::{
    CollectionLinker, CollectionRegistry, DEFAULT_REGISTRY_URL, HttpCollectionRegistry, Placement,
    RowOutcome, StaticRegistry, default_registry_url,
};
pub use report::{ArchiveOutcome, Report, ReportBuilder, RunMode};
pub use schema::{ColumnRole, ColumnSpec, TableLayout};
pub use validation::{RowVerifier, SchemaValidator, UnresolvedFile, ValidationFindings};
