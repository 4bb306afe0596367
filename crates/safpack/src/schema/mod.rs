//! Column roles derived from the table's header row.

mod column;
mod table;
mod types;

pub use column::{ColumnSpec, classify};
pub use table::TableLayout;
pub use types::ColumnRole;
