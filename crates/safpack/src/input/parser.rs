//! CSV loader for the metadata table.

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{PackagerError, Result};
use super::source::{MetadataTable, TableSource};

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

/// Loads a metadata CSV fully into memory.
pub struct TableLoader {
    config: LoaderConfig,
}

impl TableLoader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Read, decode and parse a CSV file.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(MetadataTable, TableSource)> {
        let path = path.as_ref();

        let bytes = fs::read(path).map_err(|e| {
            PackagerError::MalformedTable(format!("cannot read {}: {}", path.display(), e))
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let (text, encoding) = decode_table_bytes(&bytes);
        let table = self.load_str(&text)?;

        debug!(
            path = %path.display(),
            encoding,
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded metadata table"
        );

        let source = TableSource::new(
            path.to_path_buf(),
            hash,
            bytes.len() as u64,
            encoding,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, source))
    }

    /// Parse already-decoded CSV text.
    pub fn load_str(&self, text: &str) -> Result<MetadataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| PackagerError::MalformedTable(e.to_string()))?
            .iter()
            .map(|s| s.to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(PackagerError::MalformedTable(
                "no header row found".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                PackagerError::MalformedTable(format!("row {}: {}", row_idx + 1, e))
            })?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok(MetadataTable::new(headers, rows))
    }
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode raw table bytes into text.
///
/// A byte order mark wins; otherwise valid UTF-8 is taken as is, and anything
/// else is read as windows-1252. Returns the text and the encoding's name.
pub fn decode_table_bytes(bytes: &[u8]) -> (String, &'static str) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return (text.into_owned(), encoding.name());
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), UTF_8.name()),
        Err(_) => {
            warn!("metadata table is not valid UTF-8, decoding as windows-1252");
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (text.into_owned(), WINDOWS_1252.name())
        }
    }
}
