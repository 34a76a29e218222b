//! Wire type catalog.
//!
//! Maps every known wire type tag, canonical and synonym alike, to the
//! strategy that decodes its cells. Adding a tag is one line in
//! [`CATALOG`]; adding a strategy is one variant here and one arm in the
//! dispatcher.

use tds_engine::TypeId;

/// How the cells of a column are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeStrategy {
    /// VOID: always NULL.
    Void,
    /// BIT.
    Bit,
    /// Unsigned 8-bit integer.
    Int1,
    /// Signed 16-bit integer.
    Int2,
    /// Signed 32-bit integer.
    Int4,
    /// Signed 64-bit integer.
    Int8,
    /// Integer whose width is the cell length.
    IntN,
    /// 32-bit float.
    Real,
    /// 64-bit float.
    Float8,
    /// Float whose width is the cell length.
    FloatN,
    /// Character data with encoding fallback.
    Text,
    /// Binary data copied verbatim.
    Binary,
    /// Legacy datetime, cracked into calendar fields by the engine.
    LegacyDateTime,
    /// Extended date/time family, rendered to text by the engine and parsed.
    ExtendedTemporal,
    /// Decimal and money family, rendered to text by the engine and parsed.
    FixedPoint,
    /// 16-byte GUID.
    Guid,
    /// Unknown tag: raw bytes are kept as-is.
    Opaque,
}

/// A known tag and its strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Wire type.
    pub type_id: TypeId,
    /// Decode strategy.
    pub strategy: DecodeStrategy,
}

/// Every known tag with its strategy.
pub const CATALOG: &[(TypeId, DecodeStrategy)] = &[
    (TypeId::Void, DecodeStrategy::Void),
    // Integers
    (TypeId::Int1, DecodeStrategy::Int1),
    (TypeId::Int2, DecodeStrategy::Int2),
    (TypeId::Int4, DecodeStrategy::Int4),
    (TypeId::Int8, DecodeStrategy::Int8),
    (TypeId::IntN, DecodeStrategy::IntN),
    // Bit
    (TypeId::Bit, DecodeStrategy::Bit),
    (TypeId::BitN, DecodeStrategy::Bit),
    // Floating point
    (TypeId::Real, DecodeStrategy::Real),
    (TypeId::Flt8, DecodeStrategy::Float8),
    (TypeId::FltN, DecodeStrategy::FloatN),
    // Fixed point
    (TypeId::Decimal, DecodeStrategy::FixedPoint),
    (TypeId::Numeric, DecodeStrategy::FixedPoint),
    (TypeId::Money, DecodeStrategy::FixedPoint),
    (TypeId::Money4, DecodeStrategy::FixedPoint),
    (TypeId::MoneyN, DecodeStrategy::FixedPoint),
    // Character
    (TypeId::Char, DecodeStrategy::Text),
    (TypeId::VarChar, DecodeStrategy::Text),
    (TypeId::NVarChar, DecodeStrategy::Text),
    (TypeId::Text, DecodeStrategy::Text),
    (TypeId::NText, DecodeStrategy::Text),
    (TypeId::XChar, DecodeStrategy::Text),
    (TypeId::XVarChar, DecodeStrategy::Text),
    (TypeId::XNChar, DecodeStrategy::Text),
    (TypeId::XNVarChar, DecodeStrategy::Text),
    (TypeId::MsXml, DecodeStrategy::Text),
    (TypeId::Xml, DecodeStrategy::Text),
    // Binary
    (TypeId::Binary, DecodeStrategy::Binary),
    (TypeId::VarBinary, DecodeStrategy::Binary),
    (TypeId::Image, DecodeStrategy::Binary),
    (TypeId::XBinary, DecodeStrategy::Binary),
    (TypeId::XVarBinary, DecodeStrategy::Binary),
    (TypeId::LongBinary, DecodeStrategy::Binary),
    (TypeId::MsUdt, DecodeStrategy::Binary),
    // Legacy date/time
    (TypeId::DateTime, DecodeStrategy::LegacyDateTime),
    (TypeId::DateTime4, DecodeStrategy::LegacyDateTime),
    (TypeId::DateTimeN, DecodeStrategy::LegacyDateTime),
    // Extended date/time
    (TypeId::MsDate, DecodeStrategy::ExtendedTemporal),
    (TypeId::MsTime, DecodeStrategy::ExtendedTemporal),
    (TypeId::MsDateTime2, DecodeStrategy::ExtendedTemporal),
    (TypeId::MsDateTimeOffset, DecodeStrategy::ExtendedTemporal),
    (TypeId::Date, DecodeStrategy::ExtendedTemporal),
    (TypeId::Time, DecodeStrategy::ExtendedTemporal),
    (TypeId::DateN, DecodeStrategy::ExtendedTemporal),
    (TypeId::TimeN, DecodeStrategy::ExtendedTemporal),
    (TypeId::BigDateTime, DecodeStrategy::ExtendedTemporal),
    (TypeId::BigTime, DecodeStrategy::ExtendedTemporal),
    // Special
    (TypeId::Unique, DecodeStrategy::Guid),
];

static TABLE: [Option<CatalogEntry>; 256] = build_table();

const fn build_table() -> [Option<CatalogEntry>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < CATALOG.len() {
        let (type_id, strategy) = CATALOG[i];
        table[type_id as u8 as usize] = Some(CatalogEntry { type_id, strategy });
        i += 1;
    }
    table
}

/// Look up a raw tag. Unknown and out-of-range tags return `None`.
#[inline]
#[must_use]
pub fn lookup(tag: i32) -> Option<CatalogEntry> {
    let index = usize::try_from(tag).ok()?;
    TABLE.get(index).copied().flatten()
}

/// Classify a raw tag. Unknown tags decode as [`DecodeStrategy::Opaque`].
#[inline]
#[must_use]
pub fn classify(tag: i32) -> DecodeStrategy {
    lookup(tag).map_or(DecodeStrategy::Opaque, |entry| entry.strategy)
}
