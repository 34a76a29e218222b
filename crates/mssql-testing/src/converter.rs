//! In-memory stand-in for the engine's conversion routines.
//!
//! Cell layouts follow dblib:
//!
//! - DATETIME: `i32` days since 1900-01-01, then `u32` 1/300 s ticks since
//!   midnight, host byte order.
//! - SMALLDATETIME: `u16` days since 1900-01-01, then `u16` minutes.
//! - MONEY: high `i32` then low `u32` of a 64-bit count of 1/10000 units.
//! - SMALLMONEY: `i32` count of 1/10000 units.
//! - DECIMAL/NUMERIC: precision, scale, sign (1 = negative), then the
//!   magnitude as big-endian bytes.
//!
//! Extended date/time cells hold the text the server would render, so
//! converting them to CHAR copies the bytes.

// chrono date construction with the known-valid 1900-01-01 epoch
#![allow(clippy::expect_used)]

use chrono::{Datelike, NaiveDate, Timelike};
use tds_engine::{Convert, DateRecord, EngineError, LEGACY_DATETIME_SIZE, TypeId};

/// Ticks per second in a DATETIME time part.
pub const TICKS_PER_SECOND: u32 = 300;

/// Scale of MONEY and SMALLMONEY values.
pub const MONEY_SCALE: u8 = 4;

/// The 1900-01-01 epoch of legacy datetimes.
pub(crate) fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).expect("valid date")
}

/// dblib-faithful conversions over plain byte buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockConverter {
    fail: bool,
}

impl MockConverter {
    /// A converter that performs conversions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A converter whose every conversion fails.
    #[must_use]
    pub fn failing() -> Self {
        Self { fail: true }
    }

    fn convert_to_datetime(from: TypeId, src: &[u8]) -> Option<[u8; LEGACY_DATETIME_SIZE]> {
        if !from.is_legacy_datetime() {
            return None;
        }
        match src.len() {
            8 => src.try_into().ok(),
            4 => {
                let days = u16::from_ne_bytes([src[0], src[1]]);
                let minutes = u16::from_ne_bytes([src[2], src[3]]);
                let ticks = u32::from(minutes) * 60 * TICKS_PER_SECOND;
                let mut out = [0u8; LEGACY_DATETIME_SIZE];
                out[..4].copy_from_slice(&i32::from(days).to_ne_bytes());
                out[4..].copy_from_slice(&ticks.to_ne_bytes());
                Some(out)
            }
            _ => None,
        }
    }

    fn render_char(from: TypeId, src: &[u8]) -> Option<String> {
        match from {
            TypeId::MsDate
            | TypeId::MsTime
            | TypeId::MsDateTime2
            | TypeId::MsDateTimeOffset
            | TypeId::Date
            | TypeId::Time
            | TypeId::DateN
            | TypeId::TimeN
            | TypeId::BigDateTime
            | TypeId::BigTime
            | TypeId::Char
            | TypeId::VarChar
            | TypeId::Text => String::from_utf8(src.to_vec()).ok(),
            TypeId::Money | TypeId::Money4 | TypeId::MoneyN => render_money(src),
            TypeId::Decimal | TypeId::Numeric => render_numeric(src),
            _ => None,
        }
    }
}

fn render_money(src: &[u8]) -> Option<String> {
    let units = match src.len() {
        8 => {
            let high = i32::from_ne_bytes(src[..4].try_into().ok()?);
            let low = u32::from_ne_bytes(src[4..].try_into().ok()?);
            (i64::from(high) << 32) | i64::from(low)
        }
        4 => i64::from(i32::from_ne_bytes(src.try_into().ok()?)),
        _ => return None,
    };
    Some(format_scaled(
        units < 0,
        u128::from(units.unsigned_abs()),
        MONEY_SCALE,
    ))
}

fn render_numeric(src: &[u8]) -> Option<String> {
    let (&[_precision, scale, sign], magnitude) = src.split_first_chunk::<3>()?;
    if magnitude.is_empty() || magnitude.len() > 16 {
        return None;
    }
    let value = magnitude
        .iter()
        .fold(0u128, |acc, b| (acc << 8) | u128::from(*b));
    Some(format_scaled(sign == 1, value, scale))
}

/// Format an unsigned magnitude with `scale` fractional digits.
pub(crate) fn format_scaled(negative: bool, magnitude: u128, scale: u8) -> String {
    let scale = usize::from(scale);
    let digits = format!("{magnitude:0>width$}", width = scale + 1);
    let (int, frac) = digits.split_at(digits.len() - scale);
    let sign = if negative && magnitude != 0 { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{int}")
    } else {
        format!("{sign}{int}.{frac}")
    }
}

impl Convert for MockConverter {
    fn convert(
        &self,
        from: TypeId,
        src: &[u8],
        to: TypeId,
        dst: &mut [u8],
    ) -> Result<usize, EngineError> {
        let failed = || EngineError::ConversionFailed {
            from: from.raw(),
            to: to.raw(),
        };
        if self.fail {
            return Err(failed());
        }

        let out = match to {
            TypeId::DateTime => Self::convert_to_datetime(from, src).map(|b| b.to_vec()),
            TypeId::Char => Self::render_char(from, src).map(String::into_bytes),
            _ => None,
        }
        .ok_or_else(failed)?;

        let available = dst.len();
        let target = dst.get_mut(..out.len()).ok_or(EngineError::BufferTooSmall {
            needed: out.len(),
            available,
        })?;
        target.copy_from_slice(&out);
        Ok(out.len())
    }

    fn date_crack(&self, value: &[u8; LEGACY_DATETIME_SIZE]) -> Result<DateRecord, EngineError> {
        let failed = EngineError::ConversionFailed {
            from: TypeId::DateTime.raw(),
            to: TypeId::DateTime.raw(),
        };
        if self.fail {
            return Err(failed);
        }

        let days = i32::from_ne_bytes([value[0], value[1], value[2], value[3]]);
        let ticks = u32::from_ne_bytes([value[4], value[5], value[6], value[7]]);

        let date = epoch()
            .checked_add_signed(chrono::Duration::days(i64::from(days)))
            .ok_or(failed.clone())?;
        let seconds = ticks / TICKS_PER_SECOND;
        let millisecond = ((ticks % TICKS_PER_SECOND) * 1000 + 150) / TICKS_PER_SECOND;
        let time = chrono::NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).ok_or(failed)?;

        let field = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        Ok(DateRecord {
            year: date.year(),
            month: field(date.month0()),
            day: field(date.day()),
            day_of_year: field(date.ordinal()),
            weekday: field(date.weekday().num_days_from_sunday()),
            hour: field(time.hour()),
            minute: field(time.minute()),
            second: field(time.second()),
            millisecond: field(millisecond),
        })
    }
}
