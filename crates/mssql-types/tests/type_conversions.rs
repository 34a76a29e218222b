//! Cell decoding edge case tests.
//!
//! Tests edge cases for:
//! - NULL handling across every tag
//! - Fixed-width numeric widths
//! - Character encoding fallback
//! - Legacy and extended date/time decoding
//! - Fixed-point and GUID decoding
//! - Unknown tags

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::approx_constant
)]

use bytes::Bytes;
use chrono::{Datelike, NaiveDate, Timelike};
use mssql_testing::fixtures;
use mssql_testing::{MockCell, MockConverter};
use mssql_types::{FromSql, SqlValue, TypeError, decode_cell, try_decode_cell};
use rust_decimal::Decimal;
use std::str::FromStr;
use tds_engine::TypeId;

fn decode(type_id: TypeId, cell: &MockCell) -> SqlValue {
    decode_cell(&MockConverter::new(), type_id.raw(), cell.raw())
}

// ============================================================================
// NULL Handling Edge Cases
// ============================================================================

mod null_handling {
    use super::*;

    #[test]
    fn test_null_cell_for_every_tag() {
        for type_id in TypeId::ALL {
            assert_eq!(decode(type_id, &fixtures::null()), SqlValue::Null, "{type_id}");
        }
    }

    #[test]
    fn test_non_positive_length_is_null_regardless_of_data() {
        for type_id in TypeId::ALL {
            let zero = fixtures::int8(42).with_length(0);
            let negative = fixtures::int8(42).with_length(-1);
            assert_eq!(decode(type_id, &zero), SqlValue::Null, "{type_id}");
            assert_eq!(decode(type_id, &negative), SqlValue::Null, "{type_id}");
        }
    }

    #[test]
    fn test_void_is_null() {
        assert_eq!(decode(TypeId::Void, &fixtures::int4(1)), SqlValue::Null);
    }

    #[test]
    fn test_empty_string_is_not_null() {
        let cell = MockCell::new(Vec::new()).with_length(1);
        // length 1 over an empty buffer clamps to zero bytes
        assert_eq!(decode(TypeId::VarChar, &cell), SqlValue::String(String::new()));
    }

    #[test]
    fn test_null_to_option() {
        let value = decode(TypeId::Int4, &fixtures::null());
        assert_eq!(Option::<i32>::from_sql(&value).unwrap(), None);
        assert!(matches!(i32::from_sql(&value), Err(TypeError::UnexpectedNull)));
    }
}

// ============================================================================
// Fixed-Width Numeric Types
// ============================================================================

mod scalar {
    use super::*;

    #[test]
    fn test_integer_boundaries() {
        assert_eq!(decode(TypeId::Int1, &fixtures::int1(255)), SqlValue::TinyInt(255));
        assert_eq!(
            decode(TypeId::Int2, &fixtures::int2(i16::MIN)),
            SqlValue::SmallInt(i16::MIN)
        );
        assert_eq!(
            decode(TypeId::Int4, &fixtures::int4(i32::MAX)),
            SqlValue::Int(i32::MAX)
        );
        assert_eq!(
            decode(TypeId::Int8, &fixtures::int8(i64::MIN)),
            SqlValue::BigInt(i64::MIN)
        );
    }

    #[test]
    fn test_nullable_integer_width_follows_cell() {
        assert_eq!(decode(TypeId::IntN, &fixtures::int2(-2)), SqlValue::SmallInt(-2));
        assert_eq!(decode(TypeId::IntN, &fixtures::int8(1 << 40)), SqlValue::BigInt(1 << 40));
    }

    #[test]
    fn test_bits() {
        assert_eq!(decode(TypeId::Bit, &fixtures::bit(true)), SqlValue::Bool(true));
        assert_eq!(decode(TypeId::BitN, &fixtures::bit(false)), SqlValue::Bool(false));
    }

    #[test]
    fn test_floats() {
        assert_eq!(decode(TypeId::Real, &fixtures::real(1.25)), SqlValue::Float(1.25));
        assert_eq!(decode(TypeId::Flt8, &fixtures::float8(3.14)), SqlValue::Double(3.14));
        assert_eq!(decode(TypeId::FltN, &fixtures::real(-0.5)), SqlValue::Float(-0.5));
    }

    #[test]
    fn test_truncated_cell_degrades_to_null() {
        let short = fixtures::bytes(&[1, 2]);
        assert_eq!(decode(TypeId::Int4, &short), SqlValue::Null);
        assert!(matches!(
            try_decode_cell(&MockConverter::new(), TypeId::Int4.raw(), short.raw()),
            Err(TypeError::MalformedCell { needed: 4, available: 2, .. })
        ));
    }

    #[test]
    fn test_length_shorter_than_buffer_is_honoured() {
        // Reported length 2 over an 8-byte buffer: the INT read is short
        let cell = fixtures::int8(7).with_length(2);
        assert_eq!(decode(TypeId::Int4, &cell), SqlValue::Null);
    }
}

// ============================================================================
// Character and Binary Types
// ============================================================================

mod text {
    use super::*;

    #[test]
    fn test_unicode_passthrough() {
        let s = "日本語テスト 🎉";
        for type_id in [TypeId::NVarChar, TypeId::XNVarChar, TypeId::NText, TypeId::MsXml] {
            assert_eq!(decode(type_id, &fixtures::text(s)), SqlValue::String(s.into()));
        }
    }

    #[test]
    fn test_invalid_utf8_does_not_fail_the_cell() {
        let value = decode(TypeId::VarChar, &fixtures::bytes(b"na\xEFve"));
        assert_eq!(value, SqlValue::String("naïve".into()));
    }

    #[test]
    fn test_binary_respects_reported_length() {
        let cell = fixtures::bytes(&[1, 2, 3, 4, 5]).with_length(3);
        assert_eq!(
            decode(TypeId::VarBinary, &cell),
            SqlValue::Binary(Bytes::from_static(&[1, 2, 3]))
        );
    }

    #[test]
    fn test_binary_aliases() {
        for type_id in [
            TypeId::Binary,
            TypeId::Image,
            TypeId::XBinary,
            TypeId::XVarBinary,
            TypeId::LongBinary,
        ] {
            assert_eq!(
                decode(type_id, &fixtures::bytes(&[0xDE, 0xAD])),
                SqlValue::Binary(Bytes::from_static(&[0xDE, 0xAD]))
            );
        }
    }
}

// ============================================================================
// Date/Time Types
// ============================================================================

mod temporal {
    use super::*;

    #[test]
    fn test_legacy_datetime() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 31)
            .unwrap()
            .and_hms_milli_opt(14, 5, 6, 997)
            .unwrap();
        for type_id in [TypeId::DateTime, TypeId::DateTimeN] {
            assert_eq!(
                decode(type_id, &fixtures::datetime(expected)),
                SqlValue::DateTime(expected)
            );
        }
    }

    #[test]
    fn test_january_is_month_one() {
        let value = NaiveDate::from_ymd_opt(1999, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let SqlValue::DateTime(dt) = decode(TypeId::DateTime, &fixtures::datetime(value)) else {
            panic!("expected datetime");
        };
        assert_eq!(dt.month(), 1);
    }

    #[test]
    fn test_smalldatetime() {
        let value = NaiveDate::from_ymd_opt(2079, 6, 6)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        assert_eq!(
            decode(TypeId::DateTime4, &fixtures::smalldatetime(value)),
            SqlValue::DateTime(value)
        );
    }

    #[test]
    fn test_failed_conversion_is_null() {
        let value = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let conv = MockConverter::failing();
        let legacy = fixtures::datetime(value);
        let extended = fixtures::temporal("2023-01-01");
        assert_eq!(
            decode_cell(&conv, TypeId::DateTime.raw(), legacy.raw()),
            SqlValue::Null
        );
        assert_eq!(
            decode_cell(&conv, TypeId::MsDate.raw(), extended.raw()),
            SqlValue::Null
        );
        assert!(matches!(
            try_decode_cell(&conv, TypeId::MsDate.raw(), extended.raw()),
            Err(TypeError::ConversionFailed { type_name: "DATE", .. })
        ));
    }

    /// Converter whose date crack reports an out-of-range month.
    struct CorruptCrack;

    impl tds_engine::Convert for CorruptCrack {
        fn convert(
            &self,
            _from: TypeId,
            _src: &[u8],
            _to: TypeId,
            dst: &mut [u8],
        ) -> Result<usize, tds_engine::EngineError> {
            dst[..8].fill(0);
            Ok(8)
        }

        fn date_crack(
            &self,
            _value: &[u8; tds_engine::LEGACY_DATETIME_SIZE],
        ) -> Result<tds_engine::DateRecord, tds_engine::EngineError> {
            Ok(tds_engine::DateRecord {
                year: 2023,
                month: i32::MAX,
                day: 1,
                ..Default::default()
            })
        }
    }

    #[test]
    fn test_corrupt_date_record_is_null() {
        let cell = [0u8; 8];
        let raw = tds_engine::RawCell::new(Some(&cell[..]), 8);
        assert_eq!(
            decode_cell(&CorruptCrack, TypeId::DateTime.raw(), raw),
            SqlValue::Null
        );
        assert!(matches!(
            try_decode_cell(&CorruptCrack, TypeId::DateTime.raw(), raw),
            Err(TypeError::InvalidDateTime(_))
        ));
    }

    #[test]
    fn test_datetime2_seven_digits() {
        let value = decode(
            TypeId::MsDateTime2,
            &fixtures::temporal("2023-06-15 10:30:00.1234567"),
        );
        let SqlValue::DateTime(dt) = value else {
            panic!("expected datetime, got {value:?}");
        };
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 6, 15));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (10, 30, 0));
        assert_eq!(dt.nanosecond() / 1_000_000, 123);
    }

    #[test]
    fn test_extended_family_kinds() {
        assert!(matches!(
            decode(TypeId::MsDate, &fixtures::temporal("2024-02-29")),
            SqlValue::Date(_)
        ));
        assert!(matches!(
            decode(TypeId::MsTime, &fixtures::temporal("12:34:56.1234567")),
            SqlValue::Time(_)
        ));
        assert!(matches!(
            decode(
                TypeId::MsDateTimeOffset,
                &fixtures::temporal("2024-02-29 12:34:56.1234567 -08:00")
            ),
            SqlValue::DateTimeOffset(_)
        ));
        assert!(matches!(
            decode(TypeId::BigDateTime, &fixtures::temporal("2024-02-29 12:34:56.123456")),
            SqlValue::DateTime(_)
        ));
        assert!(matches!(
            decode(TypeId::BigTime, &fixtures::temporal("12:34:56.123456")),
            SqlValue::Time(_)
        ));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert!(matches!(
            decode(TypeId::MsDate, &fixtures::temporal("  2024-02-29\0")),
            SqlValue::Date(_)
        ));
    }

    #[test]
    fn test_unparseable_text_is_kept() {
        assert_eq!(
            decode(TypeId::MsDateTime2, &fixtures::temporal(" Feb 29 2024 12:34PM ")),
            SqlValue::String("Feb 29 2024 12:34PM".into())
        );
    }
}

// ============================================================================
// Fixed-Point Types
// ============================================================================

mod fixed_point {
    use super::*;

    #[test]
    fn test_numeric() {
        assert_eq!(
            decode(TypeId::Numeric, &fixtures::numeric(18, 4, 123_456_789)),
            SqlValue::Decimal(Decimal::from_str("12345.6789").unwrap())
        );
        assert_eq!(
            decode(TypeId::Decimal, &fixtures::numeric(5, 0, -42)),
            SqlValue::Decimal(Decimal::from(-42))
        );
    }

    #[test]
    fn test_money_family() {
        assert_eq!(
            decode(TypeId::Money, &fixtures::money(i64::MIN)),
            SqlValue::Decimal(Decimal::from_str("-922337203685477.5808").unwrap())
        );
        assert_eq!(
            decode(TypeId::Money4, &fixtures::money4(12_500)),
            SqlValue::Decimal(Decimal::from_str("1.2500").unwrap())
        );
        assert_eq!(
            decode(TypeId::MoneyN, &fixtures::money4(-1)),
            SqlValue::Decimal(Decimal::from_str("-0.0001").unwrap())
        );
    }

    #[test]
    fn test_beyond_decimal_range_is_kept_as_text() {
        let unscaled = 10i128.pow(37);
        let value = decode(TypeId::Numeric, &fixtures::numeric(38, 0, unscaled));
        assert_eq!(value, SqlValue::String(unscaled.to_string()));
    }
}

// ============================================================================
// Unique Identifier
// ============================================================================

mod guid {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_guid_round_trip() {
        let id = Uuid::parse_str("6F9619FF-8B86-D011-B42D-00C04FC964FF").unwrap();
        assert_eq!(decode(TypeId::Unique, &fixtures::guid(id)), SqlValue::Uuid(id));
    }

    #[test]
    fn test_guid_wrong_length_is_null() {
        for len in [1usize, 8, 15, 17, 32] {
            let cell = fixtures::bytes(&vec![0xAB; len]);
            assert_eq!(decode(TypeId::Unique, &cell), SqlValue::Null, "len {len}");
        }
    }
}

// ============================================================================
// Unknown Tags
// ============================================================================

mod opaque {
    use super::*;

    #[test]
    fn test_unknown_tag_keeps_bytes() {
        let cell = fixtures::bytes(&[9, 8, 7]);
        let value = decode_cell(&MockConverter::new(), 0x99, cell.raw());
        assert_eq!(value, SqlValue::Unsupported(Bytes::from_static(&[9, 8, 7])));
    }

    #[test]
    fn test_negative_tag_keeps_bytes() {
        let cell = fixtures::bytes(&[1]);
        let value = decode_cell(&MockConverter::new(), -5, cell.raw());
        assert!(matches!(value, SqlValue::Unsupported(_)));
    }
}
