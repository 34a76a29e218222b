//! Engine error types.

use thiserror::Error;

/// Errors reported by a protocol engine through the collaborator contract.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Library initialisation failed.
    #[error("engine initialisation failed: {0}")]
    InitFailed(String),

    /// A login record could not be allocated or configured.
    #[error("login record unavailable: {0}")]
    LoginFailed(String),

    /// The connection could not be opened.
    #[error("could not open connection to {server}: {reason}")]
    OpenFailed {
        /// Server the connection was opened against.
        server: String,
        /// Engine-supplied reason.
        reason: String,
    },

    /// The requested database could not be selected.
    #[error("could not use database {0}")]
    DatabaseUnavailable(String),

    /// The command was rejected on submission or execution.
    #[error("command submission failed: {0}")]
    SubmitFailed(String),

    /// The engine's conversion routine failed.
    #[error("conversion from type {from} to type {to} failed")]
    ConversionFailed {
        /// Source wire type tag.
        from: i32,
        /// Target wire type tag.
        to: i32,
    },

    /// The output buffer handed to a conversion was too small.
    #[error("conversion buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes needed.
        needed: usize,
        /// Bytes available.
        available: usize,
    },

    /// The handle has already been closed.
    #[error("connection handle closed")]
    Closed,
}
