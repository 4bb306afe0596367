//! Header validation and the read-only verification pass.

mod findings;
mod headers;
mod verifier;
pub mod vocabulary;

pub use findings::{UnresolvedFile, ValidationFindings};
pub use headers::{HeaderFindings, SchemaValidator};
pub use verifier::RowVerifier;
