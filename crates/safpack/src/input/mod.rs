//! Metadata table loading and cell value handling.

mod parser;
mod source;
mod values;

pub use parser::{LoaderConfig, TableLoader, decode_table_bytes};
pub use source::{MetadataTable, TableSource};
pub use values::{FileSpec, SEPARATOR, split_params, split_values, strip_trailing_separator};
