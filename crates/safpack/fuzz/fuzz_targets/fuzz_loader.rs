//! Fuzz target for the table loader.
//!
//! Raw bytes go through charset decoding and CSV parsing; neither may panic,
//! and a loaded table must be rectangular.

#![no_main]

use libfuzzer_sys::fuzz_target;
use safpack::input::decode_table_bytes;
use safpack::TableLoader;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let (text, _encoding) = decode_table_bytes(data);
    if let Ok(table) = TableLoader::new().load_str(&text) {
        let width = table.column_count();
        for (_, row) in table.numbered_rows() {
            assert_eq!(row.len(), width);
        }
    }
});
