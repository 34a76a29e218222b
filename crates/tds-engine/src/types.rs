//! Wire type tags.
//!
//! This module defines the column type tags as a dblib-style engine reports
//! them from column metadata. Several server types carry more than one tag:
//! legacy nullable variants, the Microsoft extended (`X`) encodings and the
//! Sybase "big" date/time encodings all appear next to their canonical
//! counterpart.

/// Wire type identifiers.
///
/// These correspond to the values returned by the engine's column-type call.
/// The numbering follows the `SYB*` / `XSYB*` constants of dblib.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeId {
    /// Void (no data).
    Void = 0x1F,

    // Integers
    /// 8-bit unsigned integer (TINYINT).
    Int1 = 0x30,
    /// 16-bit signed integer.
    Int2 = 0x34,
    /// 32-bit signed integer.
    Int4 = 0x38,
    /// 64-bit signed integer.
    Int8 = 0x7F,
    /// Nullable integer, width given by the cell length.
    IntN = 0x26,

    // Bit
    /// Bit.
    Bit = 0x32,
    /// Nullable bit.
    BitN = 0x68,

    // Floating point
    /// 32-bit float (REAL).
    Real = 0x3B,
    /// 64-bit float.
    Flt8 = 0x3E,
    /// Nullable float, width given by the cell length.
    FltN = 0x6D,

    // Fixed point
    /// Decimal.
    Decimal = 0x6A,
    /// Numeric.
    Numeric = 0x6C,
    /// 8-byte money.
    Money = 0x3C,
    /// 4-byte money (SMALLMONEY).
    Money4 = 0x7A,
    /// Nullable money.
    MoneyN = 0x6E,

    // Character
    /// Fixed-length character.
    Char = 0x2F,
    /// Variable-length character.
    VarChar = 0x27,
    /// Variable-length Unicode character.
    NVarChar = 0x67,
    /// Text.
    Text = 0x23,
    /// Unicode text.
    NText = 0x63,
    /// Extended fixed-length character.
    XChar = 0xAF,
    /// Extended variable-length character.
    XVarChar = 0xA7,
    /// Extended fixed-length Unicode character.
    XNChar = 0xEF,
    /// Extended variable-length Unicode character.
    XNVarChar = 0xE7,
    /// Microsoft XML.
    MsXml = 0xF1,
    /// Sybase XML.
    Xml = 0xA3,

    // Binary
    /// Fixed-length binary.
    Binary = 0x2D,
    /// Variable-length binary.
    VarBinary = 0x25,
    /// Image.
    Image = 0x22,
    /// Extended fixed-length binary.
    XBinary = 0xAD,
    /// Extended variable-length binary.
    XVarBinary = 0xA5,
    /// Sybase long binary.
    LongBinary = 0xE1,
    /// Microsoft CLR user-defined type.
    MsUdt = 0xF0,

    // Legacy date/time
    /// 8-byte datetime.
    DateTime = 0x3D,
    /// 4-byte small datetime.
    DateTime4 = 0x3A,
    /// Nullable datetime.
    DateTimeN = 0x6F,

    // Extended date/time
    /// Microsoft date.
    MsDate = 0x28,
    /// Microsoft time.
    MsTime = 0x29,
    /// Microsoft datetime2.
    MsDateTime2 = 0x2A,
    /// Microsoft datetimeoffset.
    MsDateTimeOffset = 0x2B,
    /// Sybase date.
    Date = 0x31,
    /// Sybase time.
    Time = 0x33,
    /// Sybase nullable date.
    DateN = 0x7B,
    /// Sybase nullable time.
    TimeN = 0x93,
    /// Sybase microsecond-precision datetime.
    BigDateTime = 0xBB,
    /// Sybase microsecond-precision time.
    BigTime = 0xBC,

    // Special
    /// Unique identifier (GUID).
    Unique = 0x24,
}

impl TypeId {
    /// Every known tag, in declaration order.
    pub const ALL: [TypeId; 48] = [
        Self::Void,
        Self::Int1,
        Self::Int2,
        Self::Int4,
        Self::Int8,
        Self::IntN,
        Self::Bit,
        Self::BitN,
        Self::Real,
        Self::Flt8,
        Self::FltN,
        Self::Decimal,
        Self::Numeric,
        Self::Money,
        Self::Money4,
        Self::MoneyN,
        Self::Char,
        Self::VarChar,
        Self::NVarChar,
        Self::Text,
        Self::NText,
        Self::XChar,
        Self::XVarChar,
        Self::XNChar,
        Self::XNVarChar,
        Self::MsXml,
        Self::Xml,
        Self::Binary,
        Self::VarBinary,
        Self::Image,
        Self::XBinary,
        Self::XVarBinary,
        Self::LongBinary,
        Self::MsUdt,
        Self::DateTime,
        Self::DateTime4,
        Self::DateTimeN,
        Self::MsDate,
        Self::MsTime,
        Self::MsDateTime2,
        Self::MsDateTimeOffset,
        Self::Date,
        Self::Time,
        Self::DateN,
        Self::TimeN,
        Self::BigDateTime,
        Self::BigTime,
        Self::Unique,
    ];

    /// Create a type ID from a raw byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| *t as u8 == value)
    }

    /// Create a type ID from the integer the engine reports.
    ///
    /// Negative or out-of-range tags are unknown.
    pub fn from_raw(value: i32) -> Option<Self> {
        u8::try_from(value).ok().and_then(Self::from_u8)
    }

    /// The raw tag value as the engine expects it back in conversion calls.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self as u8 as i32
    }

    /// Server-side type name, for logging and column descriptions.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Void => "VOID",
            Self::Int1 => "TINYINT",
            Self::Int2 => "SMALLINT",
            Self::Int4 => "INT",
            Self::Int8 => "BIGINT",
            Self::IntN => "INTN",
            Self::Bit | Self::BitN => "BIT",
            Self::Real => "REAL",
            Self::Flt8 | Self::FltN => "FLOAT",
            Self::Decimal => "DECIMAL",
            Self::Numeric => "NUMERIC",
            Self::Money | Self::MoneyN => "MONEY",
            Self::Money4 => "SMALLMONEY",
            Self::Char | Self::XChar => "CHAR",
            Self::VarChar | Self::XVarChar => "VARCHAR",
            Self::XNChar => "NCHAR",
            Self::NVarChar | Self::XNVarChar => "NVARCHAR",
            Self::Text => "TEXT",
            Self::NText => "NTEXT",
            Self::MsXml | Self::Xml => "XML",
            Self::Binary | Self::XBinary => "BINARY",
            Self::VarBinary | Self::XVarBinary => "VARBINARY",
            Self::Image => "IMAGE",
            Self::LongBinary => "LONGBINARY",
            Self::MsUdt => "UDT",
            Self::DateTime | Self::DateTimeN => "DATETIME",
            Self::DateTime4 => "SMALLDATETIME",
            Self::MsDate | Self::Date | Self::DateN => "DATE",
            Self::MsTime | Self::Time | Self::TimeN => "TIME",
            Self::MsDateTime2 => "DATETIME2",
            Self::MsDateTimeOffset => "DATETIMEOFFSET",
            Self::BigDateTime => "BIGDATETIME",
            Self::BigTime => "BIGTIME",
            Self::Unique => "UNIQUEIDENTIFIER",
        }
    }

    /// Get the fixed size of this type in bytes, if applicable.
    ///
    /// Nullable (`N`) variants have no fixed size: their width is the
    /// length of each cell.
    #[must_use]
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Void => Some(0),
            Self::Int1 | Self::Bit => Some(1),
            Self::Int2 => Some(2),
            Self::Int4 | Self::Real | Self::Money4 | Self::DateTime4 => Some(4),
            Self::Int8 | Self::Flt8 | Self::Money | Self::DateTime => Some(8),
            Self::Unique => Some(16),
            _ => None,
        }
    }

    /// Check if this is one of the legacy datetime encodings.
    #[must_use]
    pub const fn is_legacy_datetime(self) -> bool {
        matches!(self, Self::DateTime | Self::DateTime4 | Self::DateTimeN)
    }

    /// Check if this is a Unicode character type.
    #[must_use]
    pub const fn is_unicode(self) -> bool {
        matches!(
            self,
            Self::NVarChar | Self::NText | Self::XNChar | Self::XNVarChar
        )
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), *self as u8)
    }
}
