//! Per-cell decoding.
//!
//! [`decode_cell`] is the entry point the row materializer calls for every
//! cell of every row: it classifies the wire tag, picks the decoder, and
//! never fails. Errors from the decoders degrade to [`SqlValue::Null`].

use bytes::Bytes;
use tds_engine::{Convert, RawCell};

use crate::catalog::{DecodeStrategy, lookup};
use crate::error::TypeError;
use crate::value::SqlValue;
use crate::{fixed_point, guid, scalar, temporal, text};

/// Decode one cell, reporting decoder errors.
///
/// A NULL cell (no data, or a length of zero or less) is `Ok(Null)` for
/// every tag. Unknown tags keep their bytes as [`SqlValue::Unsupported`].
pub fn try_decode_cell<C: Convert + ?Sized>(
    conv: &C,
    tag: i32,
    cell: RawCell<'_>,
) -> Result<SqlValue, TypeError> {
    let Some(bytes) = cell.bytes() else {
        return Ok(SqlValue::Null);
    };

    let Some(entry) = lookup(tag) else {
        return Ok(SqlValue::Unsupported(Bytes::copy_from_slice(bytes)));
    };

    match entry.strategy {
        DecodeStrategy::Void => Ok(SqlValue::Null),
        DecodeStrategy::Bit => scalar::decode_bit(bytes),
        DecodeStrategy::Int1 => scalar::decode_int1(bytes),
        DecodeStrategy::Int2 => scalar::decode_int2(bytes),
        DecodeStrategy::Int4 => scalar::decode_int4(bytes),
        DecodeStrategy::Int8 => scalar::decode_int8(bytes),
        DecodeStrategy::IntN => scalar::decode_intn(bytes),
        DecodeStrategy::Real => scalar::decode_real(bytes),
        DecodeStrategy::Float8 => scalar::decode_float8(bytes),
        DecodeStrategy::FloatN => scalar::decode_floatn(bytes),
        DecodeStrategy::Text => Ok(text::decode_text(bytes)),
        DecodeStrategy::Binary => Ok(text::decode_binary(bytes)),
        DecodeStrategy::LegacyDateTime => {
            temporal::decode_legacy_datetime(conv, entry.type_id, bytes)
        }
        DecodeStrategy::ExtendedTemporal => temporal::decode_extended(conv, entry.type_id, bytes),
        DecodeStrategy::FixedPoint => fixed_point::decode_fixed_point(conv, entry.type_id, bytes),
        DecodeStrategy::Guid => guid::decode_guid(bytes),
        DecodeStrategy::Opaque => Ok(SqlValue::Unsupported(Bytes::copy_from_slice(bytes))),
    }
}

/// Decode one cell.
///
/// Malformed cells and failed engine conversions yield
/// [`SqlValue::Null`]; they never abort the row.
#[inline]
pub fn decode_cell<C: Convert + ?Sized>(conv: &C, tag: i32, cell: RawCell<'_>) -> SqlValue {
    match try_decode_cell(conv, tag, cell) {
        Ok(value) => value,
        Err(e) => {
            tracing::trace!(tag, error = %e, "cell decode failed, using NULL");
            SqlValue::Null
        }
    }
}
