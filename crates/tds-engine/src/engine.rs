//! The engine traits and the cursor vocabulary they share.
//!
//! A protocol engine owns the wire protocol: login negotiation, command
//! submission and cursor advance. This crate only describes the narrow
//! operation set a result-set materializer needs from it.

use std::time::Duration;

use crate::date::{DateRecord, LEGACY_DATETIME_SIZE};
use crate::error::EngineError;
use crate::message::ServerMessage;
use crate::types::TypeId;

/// Outcome of advancing to the next result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    /// A result set is available.
    More,
    /// The command has no further result sets.
    NoMoreResults,
    /// The engine failed while advancing.
    Failed,
}

/// Outcome of advancing to the next row of the current result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    /// A row is available.
    Row,
    /// The current result set is exhausted.
    NoMoreRows,
    /// The engine failed while advancing.
    Failed,
}

/// Login record fields that can be set before opening a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginField {
    /// Login user name.
    User,
    /// Login password.
    Password,
    /// Application name reported to the server.
    AppName,
    /// Client character set.
    Charset,
}

/// One column value of the current row, borrowed from the engine.
///
/// The bytes belong to the engine and are only valid until the next
/// [`EngineConnection::next_row`] call; the borrow on the connection
/// enforces that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCell<'a> {
    /// Cell bytes, or `None` for a NULL cell.
    pub data: Option<&'a [u8]>,
    /// Cell length as reported by the engine.
    pub length: i32,
}

impl<'a> RawCell<'a> {
    /// Create a cell from bytes and a reported length.
    #[must_use]
    pub const fn new(data: Option<&'a [u8]>, length: i32) -> Self {
        Self { data, length }
    }

    /// A NULL cell.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            data: None,
            length: 0,
        }
    }

    /// Check if the cell is NULL: no data, or a length of zero or less.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.data.is_none() || self.length <= 0
    }

    /// The effective cell bytes.
    ///
    /// The reported length is clamped to the buffer, so a length that
    /// overstates the data never reads past it.
    #[must_use]
    pub fn bytes(&self) -> Option<&'a [u8]> {
        let data = self.data?;
        let length = usize::try_from(self.length).ok().filter(|len| *len > 0)?;
        Some(&data[..length.min(data.len())])
    }
}

/// The engine's conversion helpers.
pub trait Convert {
    /// Convert `src`, tagged `from`, into type `to`, writing into `dst`.
    ///
    /// Returns the number of bytes written.
    fn convert(
        &self,
        from: TypeId,
        src: &[u8],
        to: TypeId,
        dst: &mut [u8],
    ) -> Result<usize, EngineError>;

    /// Decompose a native legacy datetime value into its calendar fields.
    fn date_crack(&self, value: &[u8; LEGACY_DATETIME_SIZE]) -> Result<DateRecord, EngineError>;
}

/// An open connection to a server.
///
/// A connection is not safe for concurrent use. At most one command may be
/// in flight, and callers serialize access (`&mut self` everywhere the
/// cursor moves).
pub trait EngineConnection: Convert + Send {
    /// Select the current database.
    fn use_database(&mut self, name: &str) -> Result<(), EngineError>;

    /// Submit and execute a command batch.
    fn submit(&mut self, sql: &str) -> Result<(), EngineError>;

    /// Advance to the next result set.
    fn next_result(&mut self) -> ResultStatus;

    /// Rows affected by the current result set, negative if unknown.
    fn rows_affected(&self) -> i64;

    /// Number of columns in the current result set.
    fn column_count(&self) -> usize;

    /// Name of a column (zero-based). Unnamed columns return `""`.
    fn column_name(&self, index: usize) -> &str;

    /// Raw wire type tag of a column (zero-based).
    fn column_type(&self, index: usize) -> i32;

    /// Declared byte length of a column (zero-based).
    fn column_length(&self, index: usize) -> i32;

    /// Advance to the next row of the current result set.
    fn next_row(&mut self) -> RowStatus;

    /// The value of a column (zero-based) in the current row.
    fn cell(&self, index: usize) -> RawCell<'_>;

    /// Drain the server messages collected since the last call.
    fn take_messages(&mut self) -> Vec<ServerMessage>;
}

/// A protocol engine: the factory for login records and connections.
pub trait Engine: Send + Sync + 'static {
    /// Login record type.
    type Login: Send;
    /// Connection type.
    type Connection: EngineConnection;

    /// Initialise the library. Called once per process.
    fn init(&self) -> Result<(), EngineError>;

    /// Allocate a login record.
    fn new_login(&self) -> Result<Self::Login, EngineError>;

    /// Set a field of a login record.
    fn set_login_field(
        &self,
        login: &mut Self::Login,
        field: LoginField,
        value: &str,
    ) -> Result<(), EngineError>;

    /// Set login and command timeouts. A zero command timeout waits forever.
    fn set_timeouts(&self, login: Duration, command: Duration) -> Result<(), EngineError>;

    /// Open a connection to `server` with a login record.
    fn open(&self, login: &Self::Login, server: &str) -> Result<Self::Connection, EngineError>;

    /// Close a connection.
    fn close(&self, connection: Self::Connection);

    /// Release a login record.
    fn free_login(&self, login: Self::Login);
}
