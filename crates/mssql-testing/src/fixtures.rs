//! Cell fixtures in the engine's byte layouts.
//!
//! Each helper returns a [`MockCell`] holding the bytes an engine would
//! hand over for a value of that type.

use chrono::{NaiveDateTime, Timelike};
use uuid::Uuid;

use crate::converter::{TICKS_PER_SECOND, epoch};
use crate::mock_engine::MockCell;

/// A NULL cell.
#[must_use]
pub fn null() -> MockCell {
    MockCell::null()
}

/// A BIT cell.
#[must_use]
pub fn bit(value: bool) -> MockCell {
    MockCell::new(vec![u8::from(value)])
}

/// A TINYINT cell.
#[must_use]
pub fn int1(value: u8) -> MockCell {
    MockCell::new(vec![value])
}

/// A SMALLINT cell.
#[must_use]
pub fn int2(value: i16) -> MockCell {
    MockCell::new(value.to_ne_bytes().to_vec())
}

/// An INT cell.
#[must_use]
pub fn int4(value: i32) -> MockCell {
    MockCell::new(value.to_ne_bytes().to_vec())
}

/// A BIGINT cell.
#[must_use]
pub fn int8(value: i64) -> MockCell {
    MockCell::new(value.to_ne_bytes().to_vec())
}

/// A REAL cell.
#[must_use]
pub fn real(value: f32) -> MockCell {
    MockCell::new(value.to_ne_bytes().to_vec())
}

/// A FLOAT cell.
#[must_use]
pub fn float8(value: f64) -> MockCell {
    MockCell::new(value.to_ne_bytes().to_vec())
}

/// A character cell holding UTF-8 text.
#[must_use]
pub fn text(value: &str) -> MockCell {
    MockCell::new(value.as_bytes().to_vec())
}

/// A cell holding arbitrary bytes.
#[must_use]
pub fn bytes(value: &[u8]) -> MockCell {
    MockCell::new(value.to_vec())
}

/// A UNIQUEIDENTIFIER cell in the server's mixed-endian layout.
#[must_use]
pub fn guid(value: Uuid) -> MockCell {
    MockCell::new(value.to_bytes_le().to_vec())
}

/// A DATETIME cell. Sub-second precision is rounded to 1/300 s.
#[must_use]
pub fn datetime(value: NaiveDateTime) -> MockCell {
    let days = (value.date() - epoch()).num_days();
    let days = i32::try_from(days).unwrap_or(i32::MAX);
    let millis = value.nanosecond() / 1_000_000;
    let ticks = value.num_seconds_from_midnight() * TICKS_PER_SECOND
        + (millis * TICKS_PER_SECOND + 500) / 1000;

    let mut cell = days.to_ne_bytes().to_vec();
    cell.extend_from_slice(&ticks.to_ne_bytes());
    MockCell::new(cell)
}

/// A SMALLDATETIME cell. Seconds are dropped.
#[must_use]
pub fn smalldatetime(value: NaiveDateTime) -> MockCell {
    let days = (value.date() - epoch()).num_days();
    let days = u16::try_from(days).unwrap_or(u16::MAX);
    let minutes = u16::try_from(value.num_seconds_from_midnight() / 60).unwrap_or(u16::MAX);

    let mut cell = days.to_ne_bytes().to_vec();
    cell.extend_from_slice(&minutes.to_ne_bytes());
    MockCell::new(cell)
}

/// A MONEY cell from a count of 1/10000 units.
#[must_use]
pub fn money(units: i64) -> MockCell {
    let high = (units >> 32) as i32;
    let low = (units & 0xFFFF_FFFF) as u32;
    let mut cell = high.to_ne_bytes().to_vec();
    cell.extend_from_slice(&low.to_ne_bytes());
    MockCell::new(cell)
}

/// A SMALLMONEY cell from a count of 1/10000 units.
#[must_use]
pub fn money4(units: i32) -> MockCell {
    MockCell::new(units.to_ne_bytes().to_vec())
}

/// A DECIMAL/NUMERIC cell from an unscaled value.
#[must_use]
pub fn numeric(precision: u8, scale: u8, unscaled: i128) -> MockCell {
    let mut cell = vec![precision, scale, u8::from(unscaled < 0)];
    let magnitude = unscaled.unsigned_abs().to_be_bytes();
    let first = magnitude.iter().position(|b| *b != 0).unwrap_or(15);
    cell.extend_from_slice(&magnitude[first..]);
    MockCell::new(cell)
}

/// An extended date/time cell holding the server's rendering.
#[must_use]
pub fn temporal(rendered: &str) -> MockCell {
    text(rendered)
}
