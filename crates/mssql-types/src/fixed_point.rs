//! DECIMAL, NUMERIC and money decoding.
//!
//! The binary layouts of this family depend on precision and scale, so
//! cells are rendered to text by the engine's own formatter and parsed
//! exactly.

use rust_decimal::Decimal;
use tds_engine::{Convert, TypeId};

use crate::error::TypeError;
use crate::text::{TEXT_BUFFER_SIZE, render_text};
use crate::value::SqlValue;

/// Parse engine-rendered fixed-point text.
///
/// Text that is not an exact decimal (including values beyond the 28
/// significant digits `Decimal` holds) is reported and kept as a string
/// rather than rounded or dropped.
#[must_use]
pub fn parse_fixed_point(text: &str) -> SqlValue {
    match Decimal::from_str_exact(text) {
        Ok(value) => SqlValue::Decimal(value),
        Err(e) => {
            tracing::warn!(text, error = %e, "fixed-point text is not an exact decimal, keeping as string");
            SqlValue::String(text.to_owned())
        }
    }
}

/// Decode a DECIMAL, NUMERIC, MONEY or SMALLMONEY cell.
pub fn decode_fixed_point<C: Convert + ?Sized>(
    conv: &C,
    from: TypeId,
    bytes: &[u8],
) -> Result<SqlValue, TypeError> {
    let mut buf = [0u8; TEXT_BUFFER_SIZE];
    let text = render_text(conv, from, bytes, &mut buf)?;
    Ok(parse_fixed_point(&text))
}
