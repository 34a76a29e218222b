#![no_main]

use libfuzzer_sys::fuzz_target;
use mssql_types::parse_temporal;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = parse_temporal(text.trim());
    }
});
