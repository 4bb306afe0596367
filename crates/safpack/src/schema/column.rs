//! Header classification.

use serde::{Deserialize, Serialize};

use super::types::ColumnRole;

/// Headers that name files directly.
const FILE_HEADERS: &[&str] = &["filename", "bitstream", "bitstreams", "BUNDLE:ORIGINAL"];

/// Header prefixes for file references with manifest parameters.
const FILE_PARAM_PREFIXES: &[&str] = &["filename__", "bitstream__", "bitstreams__"];

const FILEGROUP_MARKER: &str = "filegroup";
const COLLECTION_MARKER: &str = "collection";

/// A classified column of the metadata table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Header text as it appears in the table.
    pub name: String,
    /// Position in the header row (0-indexed).
    pub position: usize,
    /// Role derived from the header.
    pub role: ColumnRole,
}

impl ColumnSpec {
    /// Classify a header at a given position.
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        let name = name.into();
        let role = classify(&name);
        Self {
            name,
            position,
            role,
        }
    }
}

/// Derive the role of a column from its header.
///
/// The structural markers are checked before the `schema.element` split, so a
/// header that merely contains `collection` or `filegroup` is never treated
/// as a metadata field.
pub fn classify(header: &str) -> ColumnRole {
    if FILE_HEADERS.contains(&header) {
        return ColumnRole::FileReference;
    }

    if FILE_PARAM_PREFIXES.iter().any(|p| header.starts_with(p)) {
        return ColumnRole::FileReferenceWithParameters {
            params: params_after_marker(header),
        };
    }

    if header.contains(FILEGROUP_MARKER) {
        return ColumnRole::FileGroup {
            params: params_after_marker(header),
        };
    }

    if header.contains(COLLECTION_MARKER) {
        return ColumnRole::CollectionMembership;
    }

    match header.split_once('.') {
        Some((schema, element)) if !schema.is_empty() && !element.is_empty() => {
            ColumnRole::SchemaField {
                schema: schema.to_string(),
                element: element.to_string(),
            }
        }
        _ => ColumnRole::Unrecognized,
    }
}

fn params_after_marker(header: &str) -> String {
    header
        .split_once("__")
        .map(|(_, rest)| rest.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(schema: &str, element: &str) -> ColumnRole {
        ColumnRole::SchemaField {
            schema: schema.to_string(),
            element: element.to_string(),
        }
    }

    #[test]
    fn test_file_headers() {
        for header in ["filename", "bitstream", "bitstreams", "BUNDLE:ORIGINAL"] {
            assert_eq!(classify(header), ColumnRole::FileReference, "{}", header);
        }
    }

    #[test]
    fn test_file_headers_with_params() {
        assert_eq!(
            classify("filename__BUNDLE:TEXT"),
            ColumnRole::FileReferenceWithParameters {
                params: "BUNDLE:TEXT".to_string()
            }
        );
        assert_eq!(
            classify("bitstream__BUNDLE:TEXT__PRIMARY:true"),
            ColumnRole::FileReferenceWithParameters {
                params: "BUNDLE:TEXT__PRIMARY:true".to_string()
            }
        );
    }

    #[test]
    fn test_filegroup() {
        assert_eq!(
            classify("filegroup__PRIMARY:true"),
            ColumnRole::FileGroup {
                params: "PRIMARY:true".to_string()
            }
        );
        assert_eq!(
            classify("filegroup"),
            ColumnRole::FileGroup {
                params: String::new()
            }
        );
    }

    #[test]
    fn test_collection() {
        assert_eq!(classify("collection"), ColumnRole::CollectionMembership);
        assert_eq!(classify("collections"), ColumnRole::CollectionMembership);
        // The marker wins over the schema split.
        assert_eq!(classify("dc.collection.name"), ColumnRole::CollectionMembership);
    }

    #[test]
    fn test_schema_fields() {
        assert_eq!(classify("dc.title"), field("dc", "title"));
        assert_eq!(classify("dc.date.issued"), field("dc", "date.issued"));
        assert_eq!(classify("dcterms.modified"), field("dcterms", "modified"));
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(classify("notes"), ColumnRole::Unrecognized);
        assert_eq!(classify("dc."), ColumnRole::Unrecognized);
        assert_eq!(classify(".title"), ColumnRole::Unrecognized);
        assert_eq!(classify(""), ColumnRole::Unrecognized);
    }
}
