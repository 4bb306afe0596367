//! Core type definitions for column roles.

use serde::{Deserialize, Serialize};

/// What a column means to the packager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ColumnRole {
    /// Plain file reference (`filename`, `bitstream`, ...).
    FileReference,
    /// File reference whose header carries manifest parameters
    /// (`filename__BUNDLE:TEXT`).
    FileReferenceWithParameters { params: String },
    /// Nested `.tar.gz` archive expanded into several files.
    FileGroup { params: String },
    /// Collection handles the item belongs to.
    CollectionMembership,
    /// Metadata field: `schema.element[.qualifier]`.
    SchemaField { schema: String, element: String },
    /// Anything else; ignored while materializing.
    Unrecognized,
}

impl ColumnRole {
    /// Returns true for columns whose cells name files in the source directory.
    pub fn is_file_reference(&self) -> bool {
        matches!(
            self,
            ColumnRole::FileReference | ColumnRole::FileReferenceWithParameters { .. }
        )
    }

    /// Returns true for the structural columns that are not metadata fields.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ColumnRole::FileReference
                | ColumnRole::FileReferenceWithParameters { .. }
                | ColumnRole::FileGroup { .. }
                | ColumnRole::CollectionMembership
        )
    }

    /// Manifest parameters carried by the header, if any.
    pub fn params(&self) -> &str {
        match self {
            ColumnRole::FileReferenceWithParameters { params } => params,
            ColumnRole::FileGroup { params } => params,
            _ => "",
        }
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnRole::FileReference => "file",
            ColumnRole::FileReferenceWithParameters { .. } => "file+params",
            ColumnRole::FileGroup { .. } => "filegroup",
            ColumnRole::CollectionMembership => "collection",
            ColumnRole::SchemaField { .. } => "metadata",
            ColumnRole::Unrecognized => "unrecognized",
        }
    }
}
