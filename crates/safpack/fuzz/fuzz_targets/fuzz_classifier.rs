//! Fuzz target for header classification and header validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use safpack::schema::classify;
use safpack::{ColumnRole, SchemaValidator};

fuzz_target!(|header: &str| {
    if let ColumnRole::SchemaField { schema, element } = classify(header) {
        assert!(!schema.is_empty());
        assert!(!element.is_empty());
    }

    let findings = SchemaValidator::validate(&[header.to_string()]);
    assert!(findings.invalid.len() <= 1);
});
