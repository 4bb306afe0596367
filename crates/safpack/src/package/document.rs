//! Per-schema metadata documents (`dublin_core.xml`, `metadata_<schema>.xml`).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{PackagerError, Result};

/// The default schema; always has a document.
pub const DC_SCHEMA: &str = "dc";

/// File name of the document holding fields of `schema`.
pub fn document_file_name(schema: &str) -> String {
    if schema == DC_SCHEMA {
        "dublin_core.xml".to_string()
    } else {
        format!("metadata_{}.xml", schema)
    }
}

/// An open metadata document for one schema of one item.
///
/// The closing tag is only written by [`MetadataDocument::close`].
pub struct MetadataDocument {
    path: PathBuf,
    writer: BufWriter<File>,
    fields: usize,
}

impl MetadataDocument {
    /// Create the document in `dir` and write its opening tag.
    pub fn create(dir: &Path, schema: &str) -> Result<Self> {
        let path = dir.join(document_file_name(schema));
        let file = File::create(&path).map_err(|e| PackagerError::io(&path, e))?;
        let mut writer = BufWriter::new(file);

        write!(
            writer,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<dublin_core schema=\"{}\">\n",
            escape_xml(schema)
        )
        .map_err(|e| PackagerError::io(&path, e))?;

        Ok(Self {
            path,
            writer,
            fields: 0,
        })
    }

    /// Write one value for `element[.qualifier]`.
    pub fn write_field(&mut self, element_path: &str, value: &str) -> Result<()> {
        let (element, qualifier) = element_path.split_once('.').unwrap_or((element_path, "none"));

        writeln!(
            self.writer,
            "  <dcvalue element=\"{}\" qualifier=\"{}\">{}</dcvalue>",
            escape_xml(element),
            escape_xml(qualifier),
            escape_xml(value)
        )
        .map_err(|e| PackagerError::io(&self.path, e))?;

        self.fields += 1;
        Ok(())
    }

    /// Write the closing tag and flush. Returns the number of values written.
    pub fn close(mut self) -> Result<usize> {
        self.writer
            .write_all(b"</dublin_core>\n")
            .and_then(|_| self.writer.flush())
            .map_err(|e| PackagerError::io(&self.path, e))?;
        Ok(self.fields)
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
