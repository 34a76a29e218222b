//! # tds-engine
//!
//! The narrow interface between the result-set materializer and a native
//! TDS protocol engine (a dblib-style library that owns the socket, the
//! login handshake and the token stream).
//!
//! Nothing in this crate speaks the wire protocol. It only describes what
//! the materializer needs from an engine:
//!
//! - wire type tags as the engine reports them ([`TypeId`])
//! - result set and row cursors ([`EngineConnection`])
//! - raw cell access ([`RawCell`])
//! - the engine's own value conversion and date-crack routines ([`Convert`])
//! - login records and connection handles ([`Engine`])
//!
//! ## Design Philosophy
//!
//! Raw cells borrow from the connection. Advancing the row cursor takes
//! `&mut self`, so the borrow checker rejects any attempt to keep a cell
//! across an advance. Decoders copy what they keep.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod date;
pub mod engine;
pub mod error;
pub mod message;
pub mod types;

pub use date::{DateRecord, LEGACY_DATETIME_SIZE};
pub use engine::{Convert, Engine, EngineConnection, LoginField, RawCell, ResultStatus, RowStatus};
pub use error::EngineError;
pub use message::{MessageKind, ServerMessage};
pub use types::TypeId;
