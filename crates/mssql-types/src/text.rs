//! Character and binary decoding, and the engine string round-trip.

use std::borrow::Cow;

use bytes::Bytes;
use encoding_rs::WINDOWS_1252;
use tds_engine::{Convert, TypeId};

use crate::error::TypeError;
use crate::value::SqlValue;

/// Size of the buffer an engine renders a cell's text into.
///
/// Large enough for the longest datetime-offset rendering and for a
/// 38-digit numeric with sign and decimal point.
pub const TEXT_BUFFER_SIZE: usize = 64;

/// Decode character data.
///
/// Collation metadata is not available, so the bytes are tried as UTF-8
/// first, then as Windows-1252. Data that is neither becomes an empty
/// string rather than failing the row.
pub fn decode_str(bytes: &[u8]) -> Cow<'_, str> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(s);
    }

    let (decoded, had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    if !had_errors {
        return decoded;
    }

    tracing::trace!(len = bytes.len(), "character data undecodable, using empty string");
    Cow::Borrowed("")
}

/// Decode a character cell.
pub fn decode_text(bytes: &[u8]) -> SqlValue {
    SqlValue::String(decode_str(bytes).into_owned())
}

/// Decode a binary cell: the bytes are copied verbatim.
pub fn decode_binary(bytes: &[u8]) -> SqlValue {
    SqlValue::Binary(Bytes::copy_from_slice(bytes))
}

/// Ask the engine to render a cell as text, trimmed.
///
/// The text is written into `buf`; NUL terminators and surrounding
/// whitespace are stripped.
pub fn render_text<'b, C: Convert + ?Sized>(
    conv: &C,
    from: TypeId,
    bytes: &[u8],
    buf: &'b mut [u8],
) -> Result<Cow<'b, str>, TypeError> {
    let capacity = buf.len();
    let written = conv
        .convert(from, bytes, TypeId::Char, buf)
        .map_err(|source| TypeError::ConversionFailed {
            type_name: from.name(),
            source,
        })?;
    if written > capacity {
        return Err(TypeError::BufferTooSmall {
            needed: written,
            available: capacity,
        });
    }

    let filled: &'b [u8] = &buf[..written];
    Ok(match decode_str(filled) {
        Cow::Borrowed(s) => Cow::Borrowed(trim(s)),
        Cow::Owned(s) => Cow::Owned(trim(&s).to_owned()),
    })
}

fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\0')
}
