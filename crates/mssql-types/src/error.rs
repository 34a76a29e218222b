//! Type conversion error types.

use tds_engine::EngineError;
use thiserror::Error;

/// Errors that can occur during type conversion.
///
/// Errors raised while decoding a single cell never escape the cell
/// decoder: [`crate::decode_cell`] logs them and yields
/// [`crate::SqlValue::Null`]. They surface directly from
/// [`crate::try_decode_cell`] and from [`crate::FromSql`].
#[derive(Debug, Error)]
pub enum TypeError {
    /// Value is null when non-null was expected.
    #[error("unexpected null value")]
    UnexpectedNull,

    /// Type mismatch during conversion.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected type name.
        expected: &'static str,
        /// Actual type name.
        actual: String,
    },

    /// Value is out of range for target type.
    #[error("value out of range for {target_type}")]
    OutOfRange {
        /// Target type name.
        target_type: &'static str,
    },

    /// Invalid date/time value.
    #[error("invalid date/time: {0}")]
    InvalidDateTime(String),

    /// Invalid decimal value.
    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),

    /// Invalid UUID value.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// The engine's conversion routine failed for a cell.
    #[error("engine conversion of {type_name} failed")]
    ConversionFailed {
        /// Server type name of the cell.
        type_name: &'static str,
        /// Underlying engine error.
        #[source]
        source: EngineError,
    },

    /// A cell's byte length does not fit its type.
    #[error("malformed {type_name} cell: need {needed} bytes, have {available}")]
    MalformedCell {
        /// Server type name of the cell.
        type_name: &'static str,
        /// Bytes needed.
        needed: usize,
        /// Bytes available.
        available: usize,
    },

    /// Buffer too small for value.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes needed.
        needed: usize,
        /// Bytes available.
        available: usize,
    },
}
