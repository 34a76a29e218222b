//! Property tests for the cell decoder.
//!
//! The decoder runs on untrusted server data in a tight loop, so for any
//! tag, length and bytes it must return a value and never panic.

#![allow(clippy::unwrap_used)]

use mssql_testing::MockConverter;
use mssql_types::{SqlValue, decode_cell};
use proptest::prelude::*;
use tds_engine::{RawCell, TypeId};

fn known_tag() -> impl Strategy<Value = i32> {
    prop::sample::select(TypeId::ALL.to_vec()).prop_map(TypeId::raw)
}

proptest! {
    #[test]
    fn arbitrary_cells_never_panic(
        tag in prop_oneof![known_tag(), any::<i32>()],
        data in prop::option::of(prop::collection::vec(any::<u8>(), 0..80)),
        length in -4i32..96,
    ) {
        let cell = RawCell::new(data.as_deref(), length);
        let _ = decode_cell(&MockConverter::new(), tag, cell);
    }

    #[test]
    fn non_positive_length_is_null(
        tag in known_tag(),
        data in prop::collection::vec(any::<u8>(), 0..32),
        length in i32::MIN..=0,
    ) {
        let cell = RawCell::new(Some(data.as_slice()), length);
        prop_assert_eq!(decode_cell(&MockConverter::new(), tag, cell), SqlValue::Null);
    }

    #[test]
    fn integers_round_trip_at_their_width(v16 in any::<i16>(), v32 in any::<i32>(), v64 in any::<i64>()) {
        let conv = MockConverter::new();
        let b16 = v16.to_ne_bytes();
        let b32 = v32.to_ne_bytes();
        let b64 = v64.to_ne_bytes();
        prop_assert_eq!(
            decode_cell(&conv, TypeId::Int2.raw(), RawCell::new(Some(&b16[..]), 2)),
            SqlValue::SmallInt(v16)
        );
        prop_assert_eq!(
            decode_cell(&conv, TypeId::Int4.raw(), RawCell::new(Some(&b32[..]), 4)),
            SqlValue::Int(v32)
        );
        prop_assert_eq!(
            decode_cell(&conv, TypeId::Int8.raw(), RawCell::new(Some(&b64[..]), 8)),
            SqlValue::BigInt(v64)
        );
    }

    #[test]
    fn decoding_is_deterministic(
        tag in known_tag(),
        data in prop::collection::vec(any::<u8>(), 1..40),
    ) {
        let length = i32::try_from(data.len()).unwrap();
        let copy = data.clone();
        let first = decode_cell(&MockConverter::new(), tag, RawCell::new(Some(data.as_slice()), length));
        let second = decode_cell(&MockConverter::new(), tag, RawCell::new(Some(copy.as_slice()), length));
        // NaN floats compare unequal, so compare their bits
        match (&first, &second) {
            (SqlValue::Float(a), SqlValue::Float(b)) => prop_assert_eq!(a.to_bits(), b.to_bits()),
            (SqlValue::Double(a), SqlValue::Double(b)) => prop_assert_eq!(a.to_bits(), b.to_bits()),
            _ => prop_assert_eq!(first, second),
        }
    }

    #[test]
    fn guid_requires_sixteen_bytes(data in prop::collection::vec(any::<u8>(), 1..40)) {
        let length = i32::try_from(data.len()).unwrap();
        let value = decode_cell(&MockConverter::new(), TypeId::Unique.raw(), RawCell::new(Some(data.as_slice()), length));
        prop_assert_eq!(matches!(value, SqlValue::Uuid(_)), data.len() == 16);
    }
}
