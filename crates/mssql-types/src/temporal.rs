//! Date and time decoding.
//!
//! Two families:
//!
//! - Legacy DATETIME / SMALLDATETIME cells are converted to the engine's
//!   native datetime, cracked into calendar fields, and composed here.
//! - The extended family (DATE, TIME, DATETIME2, DATETIMEOFFSET and the
//!   Sybase date/time types) is rendered to text by the engine and parsed
//!   against an ordered list of formats. Text that matches none of them is
//!   kept as a string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tds_engine::{Convert, DateRecord, LEGACY_DATETIME_SIZE, TypeId};

use crate::error::TypeError;
use crate::text::{TEXT_BUFFER_SIZE, render_text};
use crate::value::SqlValue;

const DATE: &str = "%Y-%m-%d";
const TIME: &str = "%H:%M:%S";
const TIME_FRACTION: &str = "%H:%M:%S%.f";
const DATETIME: &str = "%Y-%m-%d %H:%M:%S";
const DATETIME_FRACTION: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATETIME_OFFSET: &str = "%Y-%m-%d %H:%M:%S%.f %:z";

/// A text layout the extended temporal parser recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalFormat {
    /// `yyyy-mm-dd hh:mm:ss.fffffff`
    DateTime7,
    /// `yyyy-mm-dd hh:mm:ss.fff`
    DateTime3,
    /// `yyyy-mm-dd hh:mm:ss`
    DateTime,
    /// `yyyy-mm-dd`
    Date,
    /// `hh:mm:ss.fffffff`
    Time7,
    /// `hh:mm:ss`
    Time,
    /// `yyyy-mm-dd hh:mm:ss.f` with any other number of fraction digits.
    DateTimeFraction,
    /// `hh:mm:ss.f` with any other number of fraction digits.
    TimeFraction,
    /// `yyyy-mm-dd hh:mm:ss[.f] +hh:mm`
    DateTimeOffset,
}

impl TemporalFormat {
    /// Formats in the order they are tried. The first match wins.
    pub const ORDER: [TemporalFormat; 9] = [
        Self::DateTime7,
        Self::DateTime3,
        Self::DateTime,
        Self::Date,
        Self::Time7,
        Self::Time,
        Self::DateTimeFraction,
        Self::TimeFraction,
        Self::DateTimeOffset,
    ];

    fn parse(self, text: &str, digits: Option<usize>) -> Option<SqlValue> {
        match self {
            Self::DateTime7 if digits == Some(7) => naive_datetime(text, DATETIME_FRACTION),
            Self::DateTime3 if digits == Some(3) => naive_datetime(text, DATETIME_FRACTION),
            Self::DateTime => naive_datetime(text, DATETIME),
            Self::Date => NaiveDate::parse_from_str(text, DATE)
                .ok()
                .map(SqlValue::Date),
            Self::Time7 if digits == Some(7) => naive_time(text, TIME_FRACTION),
            Self::Time => naive_time(text, TIME),
            Self::DateTimeFraction if digits.is_some() => naive_datetime(text, DATETIME_FRACTION),
            Self::TimeFraction if digits.is_some() => naive_time(text, TIME_FRACTION),
            Self::DateTimeOffset => DateTime::parse_from_str(text, DATETIME_OFFSET)
                .ok()
                .map(SqlValue::DateTimeOffset),
            _ => None,
        }
    }
}

fn naive_datetime(text: &str, format: &str) -> Option<SqlValue> {
    NaiveDateTime::parse_from_str(text, format)
        .ok()
        .map(SqlValue::DateTime)
}

fn naive_time(text: &str, format: &str) -> Option<SqlValue> {
    NaiveTime::parse_from_str(text, format)
        .ok()
        .map(SqlValue::Time)
}

/// Number of fractional-second digits in `text`, if it has a fraction.
fn fraction_digits(text: &str) -> Option<usize> {
    let (_, rest) = text.split_once('.')?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    (digits > 0).then_some(digits)
}

/// Parse engine-rendered temporal text.
///
/// Returns the value and the format that matched, or `None` if no format
/// matches.
#[must_use]
pub fn parse_temporal(text: &str) -> Option<(SqlValue, TemporalFormat)> {
    let digits = fraction_digits(text);
    TemporalFormat::ORDER
        .iter()
        .find_map(|format| format.parse(text, digits).map(|value| (value, *format)))
}

/// Compose a timestamp from a cracked date record.
///
/// The record's month is zero-based; the timestamp's is one-based.
pub fn compose_datetime(record: &DateRecord) -> Result<NaiveDateTime, TypeError> {
    let field = |v: i32| u32::try_from(v).ok();
    let invalid = || TypeError::InvalidDateTime(format!("{record:?}"));

    let date = record
        .calendar_month()
        .and_then(field)
        .zip(field(record.day))
        .and_then(|(month, day)| NaiveDate::from_ymd_opt(record.year, month, day))
        .ok_or_else(invalid)?;

    let hour = field(record.hour).ok_or_else(invalid)?;
    let minute = field(record.minute).ok_or_else(invalid)?;
    let second = field(record.second).ok_or_else(invalid)?;
    let milli = field(record.millisecond).ok_or_else(invalid)?;

    date.and_hms_milli_opt(hour, minute, second, milli)
        .ok_or_else(invalid)
}

/// Decode a legacy DATETIME, SMALLDATETIME or DATETIMN cell.
pub fn decode_legacy_datetime<C: Convert + ?Sized>(
    conv: &C,
    from: TypeId,
    bytes: &[u8],
) -> Result<SqlValue, TypeError> {
    let conversion_failed = |source| TypeError::ConversionFailed {
        type_name: from.name(),
        source,
    };

    let mut native = [0u8; LEGACY_DATETIME_SIZE];
    let written = conv
        .convert(from, bytes, TypeId::DateTime, &mut native)
        .map_err(conversion_failed)?;
    if written != LEGACY_DATETIME_SIZE {
        return Err(TypeError::MalformedCell {
            type_name: from.name(),
            needed: LEGACY_DATETIME_SIZE,
            available: written,
        });
    }

    let record = conv.date_crack(&native).map_err(conversion_failed)?;
    compose_datetime(&record).map(SqlValue::DateTime)
}

/// Decode a cell of the extended date/time family.
///
/// Text the parser does not recognise is returned as
/// [`SqlValue::String`]; only a failed engine conversion is an error.
pub fn decode_extended<C: Convert + ?Sized>(
    conv: &C,
    from: TypeId,
    bytes: &[u8],
) -> Result<SqlValue, TypeError> {
    let mut buf = [0u8; TEXT_BUFFER_SIZE];
    let text = render_text(conv, from, bytes, &mut buf)?;

    match parse_temporal(&text) {
        Some((value, _)) => Ok(value),
        None => {
            tracing::trace!(
                type_name = from.name(),
                text = %text,
                "unrecognised temporal text, keeping as string"
            );
            Ok(SqlValue::String(text.into_owned()))
        }
    }
}
