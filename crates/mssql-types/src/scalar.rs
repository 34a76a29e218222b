//! Fixed-width numeric and boolean decoding.
//!
//! The engine hands cells over in host byte order, so every read uses the
//! native layout at exactly the width of the type. A cell shorter than that
//! width is malformed; extra trailing bytes are never read.

use crate::error::TypeError;
use crate::value::SqlValue;

fn read<const N: usize>(bytes: &[u8], type_name: &'static str) -> Result<[u8; N], TypeError> {
    bytes
        .get(..N)
        .and_then(|head| <[u8; N]>::try_from(head).ok())
        .ok_or(TypeError::MalformedCell {
            type_name,
            needed: N,
            available: bytes.len(),
        })
}

/// Decode a BIT cell.
pub fn decode_bit(bytes: &[u8]) -> Result<SqlValue, TypeError> {
    let [b] = read::<1>(bytes, "BIT")?;
    Ok(SqlValue::Bool(b != 0))
}

/// Decode a TINYINT cell (unsigned).
pub fn decode_int1(bytes: &[u8]) -> Result<SqlValue, TypeError> {
    Ok(SqlValue::TinyInt(u8::from_ne_bytes(read(bytes, "TINYINT")?)))
}

/// Decode a SMALLINT cell.
pub fn decode_int2(bytes: &[u8]) -> Result<SqlValue, TypeError> {
    Ok(SqlValue::SmallInt(i16::from_ne_bytes(read(bytes, "SMALLINT")?)))
}

/// Decode an INT cell.
pub fn decode_int4(bytes: &[u8]) -> Result<SqlValue, TypeError> {
    Ok(SqlValue::Int(i32::from_ne_bytes(read(bytes, "INT")?)))
}

/// Decode a BIGINT cell.
pub fn decode_int8(bytes: &[u8]) -> Result<SqlValue, TypeError> {
    Ok(SqlValue::BigInt(i64::from_ne_bytes(read(bytes, "BIGINT")?)))
}

/// Decode a nullable integer cell. The cell length selects the width.
pub fn decode_intn(bytes: &[u8]) -> Result<SqlValue, TypeError> {
    match bytes.len() {
        1 => decode_int1(bytes),
        2 => decode_int2(bytes),
        4 => decode_int4(bytes),
        8 => decode_int8(bytes),
        n => Err(TypeError::MalformedCell {
            type_name: "INTN",
            needed: if n < 8 { n.next_power_of_two() } else { 8 },
            available: n,
        }),
    }
}

/// Decode a REAL cell.
pub fn decode_real(bytes: &[u8]) -> Result<SqlValue, TypeError> {
    Ok(SqlValue::Float(f32::from_ne_bytes(read(bytes, "REAL")?)))
}

/// Decode a FLOAT cell.
pub fn decode_float8(bytes: &[u8]) -> Result<SqlValue, TypeError> {
    Ok(SqlValue::Double(f64::from_ne_bytes(read(bytes, "FLOAT")?)))
}

/// Decode a nullable float cell. The cell length selects the width.
pub fn decode_floatn(bytes: &[u8]) -> Result<SqlValue, TypeError> {
    match bytes.len() {
        4 => decode_real(bytes),
        8 => decode_float8(bytes),
        n => Err(TypeError::MalformedCell {
            type_name: "FLTN",
            needed: if n < 4 { 4 } else { 8 },
            available: n,
        }),
    }
}
