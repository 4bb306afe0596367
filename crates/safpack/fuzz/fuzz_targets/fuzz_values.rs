//! Fuzz target for multi-value cells and file parameters.

#![no_main]

use libfuzzer_sys::fuzz_target;
use safpack::input::{FileSpec, split_values};

fuzz_target!(|cell: &str| {
    for value in split_values(cell) {
        assert!(!value.is_empty());
        let spec = FileSpec::parse(value);
        let _ = spec.placed_name();
        assert!(spec.params.iter().all(|p| !p.is_empty()));
    }
});
