#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mssql_testing::MockConverter;
use mssql_types::{SqlValue, decode_cell};
use tds_engine::RawCell;

/// One cell as the engine might hand it over, including lengths that
/// disagree with the buffer.
#[derive(Debug, Arbitrary)]
struct FuzzCell {
    tag: i32,
    length: i32,
    data: Option<Vec<u8>>,
    failing_engine: bool,
}

fuzz_target!(|input: FuzzCell| {
    let conv = if input.failing_engine {
        MockConverter::failing()
    } else {
        MockConverter::new()
    };
    let cell = RawCell::new(input.data.as_deref(), input.length);

    let first = decode_cell(&conv, input.tag, cell);
    if input.length <= 0 {
        assert_eq!(first, SqlValue::Null);
    }

    // Decoding is a pure function of the cell.
    let second = decode_cell(&conv, input.tag, cell);
    if !matches!(first, SqlValue::Float(_) | SqlValue::Double(_)) {
        assert_eq!(first, second);
    }
});
