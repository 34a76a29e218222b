//! UNIQUEIDENTIFIER decoding.

use uuid::Uuid;

use crate::error::TypeError;
use crate::value::SqlValue;

/// Size of a GUID cell.
pub const GUID_SIZE: usize = 16;

/// Decode a GUID cell.
///
/// The server stores the first three fields little-endian and the last
/// eight bytes as-is, which is exactly the layout `Uuid::from_bytes_le`
/// expects. Any length other than 16 is malformed.
pub fn decode_guid(bytes: &[u8]) -> Result<SqlValue, TypeError> {
    let raw = <[u8; GUID_SIZE]>::try_from(bytes).map_err(|_| TypeError::MalformedCell {
        type_name: "UNIQUEIDENTIFIER",
        needed: GUID_SIZE,
        available: bytes.len(),
    })?;
    Ok(SqlValue::Uuid(Uuid::from_bytes_le(raw)))
}
