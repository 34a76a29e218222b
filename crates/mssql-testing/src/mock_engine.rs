//! Scripted in-memory protocol engine.
//!
//! [`MockEngine`] implements the engine traits without a server. Each SQL
//! text maps to a [`MockResponse`]: a sequence of result sets and failures
//! replayed through the cursor calls exactly as a dblib engine reports
//! them. The engine records what was asked of it so tests can assert on
//! the connection lifecycle.
//!
//! ## Example
//!
//! ```rust
//! use mssql_testing::fixtures;
//! use mssql_testing::mock_engine::{MockColumn, MockEngine, MockResponse};
//!
//! let engine = MockEngine::builder()
//!     .with_response(
//!         "SELECT 1 AS n",
//!         MockResponse::rows(vec![MockColumn::int("n")], vec![vec![fixtures::int4(1)]]),
//!     )
//!     .build();
//! assert_eq!(engine.stats().connections_opened, 0);
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tds_engine::{
    Convert, DateRecord, Engine, EngineConnection, EngineError, LEGACY_DATETIME_SIZE, LoginField,
    RawCell, ResultStatus, RowStatus, ServerMessage, TypeId,
};

use crate::converter::MockConverter;

/// One cell of a mock row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCell {
    /// Cell bytes, or `None` for NULL.
    pub data: Option<Vec<u8>>,
    /// Length reported for the cell.
    pub length: i32,
}

impl MockCell {
    /// A cell holding `data`, reporting its length.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        let length = i32::try_from(data.len()).unwrap_or(i32::MAX);
        Self {
            data: Some(data),
            length,
        }
    }

    /// A NULL cell.
    #[must_use]
    pub fn null() -> Self {
        Self {
            data: None,
            length: 0,
        }
    }

    /// Override the reported length.
    #[must_use]
    pub fn with_length(mut self, length: i32) -> Self {
        self.length = length;
        self
    }

    /// Borrow as an engine cell.
    #[must_use]
    pub fn raw(&self) -> RawCell<'_> {
        RawCell::new(self.data.as_deref(), self.length)
    }
}

/// Column definition for mock responses.
#[derive(Debug, Clone)]
pub struct MockColumn {
    /// Column name.
    pub name: String,
    /// Raw wire type tag.
    pub tag: i32,
    /// Declared byte length.
    pub length: i32,
}

impl MockColumn {
    /// Create a new column definition.
    pub fn new(name: impl Into<String>, type_id: TypeId) -> Self {
        let length = type_id
            .fixed_size()
            .and_then(|size| i32::try_from(size).ok())
            .unwrap_or(0);
        Self::with_tag(name, type_id.raw(), length)
    }

    /// Create a column with an arbitrary tag, known or not.
    pub fn with_tag(name: impl Into<String>, tag: i32, length: i32) -> Self {
        Self {
            name: name.into(),
            tag,
            length,
        }
    }

    /// Create an INT column.
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, TypeId::Int4)
    }

    /// Create a BIGINT column.
    pub fn bigint(name: impl Into<String>) -> Self {
        Self::new(name, TypeId::Int8)
    }

    /// Create a nullable integer column of the given width.
    pub fn intn(name: impl Into<String>, width: i32) -> Self {
        Self::new(name, TypeId::IntN).with_length(width)
    }

    /// Create a BIT column.
    pub fn bit(name: impl Into<String>) -> Self {
        Self::new(name, TypeId::Bit)
    }

    /// Create a FLOAT column.
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, TypeId::Flt8)
    }

    /// Create a VARCHAR column.
    pub fn varchar(name: impl Into<String>, max_len: i32) -> Self {
        Self::new(name, TypeId::VarChar).with_length(max_len)
    }

    /// Create an NVARCHAR column.
    pub fn nvarchar(name: impl Into<String>, max_len: i32) -> Self {
        Self::new(name, TypeId::XNVarChar).with_length(max_len * 2)
    }

    /// Create a VARBINARY column.
    pub fn varbinary(name: impl Into<String>, max_len: i32) -> Self {
        Self::new(name, TypeId::XVarBinary).with_length(max_len)
    }

    /// Create a DATETIME column.
    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, TypeId::DateTime)
    }

    /// Create a SMALLDATETIME column.
    pub fn smalldatetime(name: impl Into<String>) -> Self {
        Self::new(name, TypeId::DateTime4)
    }

    /// Create a DATE column.
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, TypeId::MsDate).with_length(3)
    }

    /// Create a TIME column.
    pub fn time(name: impl Into<String>) -> Self {
        Self::new(name, TypeId::MsTime).with_length(5)
    }

    /// Create a DATETIME2 column.
    pub fn datetime2(name: impl Into<String>) -> Self {
        Self::new(name, TypeId::MsDateTime2).with_length(8)
    }

    /// Create a DATETIMEOFFSET column.
    pub fn datetimeoffset(name: impl Into<String>) -> Self {
        Self::new(name, TypeId::MsDateTimeOffset).with_length(10)
    }

    /// Create a DECIMAL column.
    pub fn decimal(name: impl Into<String>) -> Self {
        Self::new(name, TypeId::Decimal).with_length(17)
    }

    /// Create a MONEY column.
    pub fn money(name: impl Into<String>) -> Self {
        Self::new(name, TypeId::Money)
    }

    /// Create a UNIQUEIDENTIFIER column.
    pub fn guid(name: impl Into<String>) -> Self {
        Self::new(name, TypeId::Unique)
    }

    /// Set the declared length.
    #[must_use]
    pub fn with_length(mut self, length: i32) -> Self {
        self.length = length;
        self
    }
}

/// One result set of a mock response.
#[derive(Debug, Clone, Default)]
pub struct MockResultSet {
    /// Column definitions. Empty for a pure statement.
    pub columns: Vec<MockColumn>,
    /// Row data.
    pub rows: Vec<Vec<MockCell>>,
    /// Count reported for this result set, negative if none.
    pub rows_affected: i64,
    /// Row index at which row advance fails, if any.
    pub fail_at_row: Option<usize>,
}

impl MockResultSet {
    /// A result set with rows and no affected-row count.
    pub fn new(columns: Vec<MockColumn>, rows: Vec<Vec<MockCell>>) -> Self {
        Self {
            columns,
            rows,
            rows_affected: -1,
            fail_at_row: None,
        }
    }

    /// A column-less result set reporting a count, as an UPDATE produces.
    pub fn statement(rows_affected: i64) -> Self {
        Self {
            rows_affected,
            ..Self::new(Vec::new(), Vec::new())
        }
    }

    /// Report an affected-row count.
    #[must_use]
    pub fn with_rows_affected(mut self, count: i64) -> Self {
        self.rows_affected = count;
        self
    }

    /// Fail row advance at the given row index.
    #[must_use]
    pub fn failing_at_row(mut self, index: usize) -> Self {
        self.fail_at_row = Some(index);
        self
    }
}

#[derive(Debug, Clone)]
enum MockStep {
    ResultSet(MockResultSet),
    Failure(ServerMessage),
}

/// Scripted outcome of submitting one SQL text.
#[derive(Debug, Clone)]
pub struct MockResponse {
    steps: Vec<MockStep>,
    rows_affected: i64,
    rejection: Option<ServerMessage>,
    messages: Vec<ServerMessage>,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self::empty()
    }
}

impl MockResponse {
    /// No result sets and no count.
    pub fn empty() -> Self {
        Self {
            steps: Vec::new(),
            rows_affected: -1,
            rejection: None,
            messages: Vec::new(),
        }
    }

    /// No result sets; the engine reports `count` once results are done.
    pub fn affected(count: i64) -> Self {
        Self {
            rows_affected: count,
            ..Self::empty()
        }
    }

    /// A single result set.
    pub fn rows(columns: Vec<MockColumn>, rows: Vec<Vec<MockCell>>) -> Self {
        Self::empty().then_result_set(MockResultSet::new(columns, rows))
    }

    /// The command is rejected on submission.
    pub fn reject(number: i32, message: impl Into<String>) -> Self {
        Self {
            rejection: Some(ServerMessage::error(number, 16, message)),
            ..Self::empty()
        }
    }

    /// Append a result set with rows.
    #[must_use]
    pub fn then_rows(self, columns: Vec<MockColumn>, rows: Vec<Vec<MockCell>>) -> Self {
        self.then_result_set(MockResultSet::new(columns, rows))
    }

    /// Append a result set.
    #[must_use]
    pub fn then_result_set(mut self, set: MockResultSet) -> Self {
        self.steps.push(MockStep::ResultSet(set));
        self
    }

    /// Append a failure of the result-set advance, raising an error message.
    #[must_use]
    pub fn then_failure(mut self, number: i32, message: impl Into<String>) -> Self {
        self.steps
            .push(MockStep::Failure(ServerMessage::error(number, 16, message)));
        self
    }

    /// Raise a message when the command is submitted.
    #[must_use]
    pub fn with_message(mut self, message: ServerMessage) -> Self {
        self.messages.push(message);
        self
    }
}

/// What the engine was asked to do.
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    /// Calls to `init`.
    pub init_calls: usize,
    /// Login records allocated.
    pub logins_allocated: usize,
    /// Login records released.
    pub logins_freed: usize,
    /// Connections opened.
    pub connections_opened: usize,
    /// Connections closed.
    pub connections_closed: usize,
    /// Server string of the last open.
    pub last_server: Option<String>,
    /// Login fields of the last open.
    pub login_fields: HashMap<LoginField, String>,
    /// Last timeouts set, login then command.
    pub timeouts: Option<(Duration, Duration)>,
    /// Databases selected, in order.
    pub databases_used: Vec<String>,
    /// Commands submitted, in order.
    pub submitted: Vec<String>,
    /// Most commands ever running at once, across all connections.
    pub max_in_flight: usize,
}

#[derive(Debug, Default)]
struct Script {
    responses: HashMap<String, MockResponse>,
    default_response: Option<MockResponse>,
    databases: Option<HashSet<String>>,
    refuse_open: bool,
    failing_conversions: bool,
    latency: Duration,
}

impl Script {
    fn response(&self, sql: &str) -> Option<&MockResponse> {
        self.responses
            .get(sql.trim())
            .or(self.default_response.as_ref())
    }
}

/// Builder for [`MockEngine`].
#[derive(Debug, Default)]
pub struct MockEngineBuilder {
    script: Script,
    init_failures: usize,
}

impl MockEngineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for a specific SQL text.
    #[must_use]
    pub fn with_response(mut self, sql: impl Into<String>, response: MockResponse) -> Self {
        let sql: String = sql.into();
        self.script.responses.insert(sql.trim().to_owned(), response);
        self
    }

    /// Set the response for SQL texts without a specific one.
    #[must_use]
    pub fn with_default_response(mut self, response: MockResponse) -> Self {
        self.script.default_response = Some(response);
        self
    }

    /// Restrict the databases that can be selected.
    #[must_use]
    pub fn with_database(mut self, name: impl Into<String>) -> Self {
        self.script
            .databases
            .get_or_insert_with(HashSet::new)
            .insert(name.into());
        self
    }

    /// Fail the first `count` calls to `init`.
    #[must_use]
    pub fn with_init_failures(mut self, count: usize) -> Self {
        self.init_failures = count;
        self
    }

    /// Refuse every connection.
    #[must_use]
    pub fn refusing_connections(mut self) -> Self {
        self.script.refuse_open = true;
        self
    }

    /// Fail every engine conversion.
    #[must_use]
    pub fn with_failing_conversions(mut self) -> Self {
        self.script.failing_conversions = true;
        self
    }

    /// Sleep for `latency` on every result-set advance.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.script.latency = latency;
        self
    }

    /// Build the engine.
    pub fn build(self) -> MockEngine {
        MockEngine {
            script: Arc::new(self.script),
            state: Arc::new(Mutex::new(EngineState {
                stats: EngineStats::default(),
                init_failures: self.init_failures,
                in_flight: 0,
            })),
        }
    }
}

#[derive(Debug)]
struct EngineState {
    stats: EngineStats,
    init_failures: usize,
    in_flight: usize,
}

impl EngineState {
    fn command_started(&mut self) {
        self.in_flight += 1;
        self.stats.max_in_flight = self.stats.max_in_flight.max(self.in_flight);
    }

    fn command_finished(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}

/// A scripted, in-memory protocol engine.
#[derive(Debug, Clone)]
pub struct MockEngine {
    script: Arc<Script>,
    state: Arc<Mutex<EngineState>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        MockEngineBuilder::new().build()
    }
}

impl MockEngine {
    /// Create a builder.
    pub fn builder() -> MockEngineBuilder {
        MockEngineBuilder::new()
    }

    /// Snapshot of what the engine was asked to do.
    pub fn stats(&self) -> EngineStats {
        self.state.lock().stats.clone()
    }

    /// Open a connection directly, bypassing login handling.
    pub fn connect(&self) -> MockConnection {
        MockConnection::new(Arc::clone(&self.script), Arc::clone(&self.state))
    }
}

/// Login record of a [`MockEngine`].
#[derive(Debug, Clone, Default)]
pub struct MockLogin {
    /// Fields set on the record.
    pub fields: HashMap<LoginField, String>,
}

impl Engine for MockEngine {
    type Login = MockLogin;
    type Connection = MockConnection;

    fn init(&self) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        state.stats.init_calls += 1;
        if state.init_failures > 0 {
            state.init_failures -= 1;
            return Err(EngineError::InitFailed("scripted init failure".into()));
        }
        Ok(())
    }

    fn new_login(&self) -> Result<MockLogin, EngineError> {
        self.state.lock().stats.logins_allocated += 1;
        Ok(MockLogin::default())
    }

    fn set_login_field(
        &self,
        login: &mut MockLogin,
        field: LoginField,
        value: &str,
    ) -> Result<(), EngineError> {
        login.fields.insert(field, value.to_owned());
        Ok(())
    }

    fn set_timeouts(&self, login: Duration, command: Duration) -> Result<(), EngineError> {
        self.state.lock().stats.timeouts = Some((login, command));
        Ok(())
    }

    fn open(&self, login: &MockLogin, server: &str) -> Result<MockConnection, EngineError> {
        if self.script.refuse_open {
            return Err(EngineError::OpenFailed {
                server: server.to_owned(),
                reason: "connection refused".into(),
            });
        }
        {
            let mut state = self.state.lock();
            state.stats.connections_opened += 1;
            state.stats.last_server = Some(server.to_owned());
            state.stats.login_fields = login.fields.clone();
        }
        Ok(self.connect())
    }

    fn close(&self, connection: MockConnection) {
        drop(connection);
        self.state.lock().stats.connections_closed += 1;
    }

    fn free_login(&self, _login: MockLogin) {
        self.state.lock().stats.logins_freed += 1;
    }
}

#[derive(Debug)]
struct Execution {
    steps: VecDeque<MockStep>,
    current: Option<MockResultSet>,
    row: Option<usize>,
    rows_affected: i64,
    finished: bool,
}

/// A connection of a [`MockEngine`].
#[derive(Debug)]
pub struct MockConnection {
    script: Arc<Script>,
    state: Arc<Mutex<EngineState>>,
    converter: MockConverter,
    execution: Option<Execution>,
    messages: Vec<ServerMessage>,
    database: Option<String>,
    closed: bool,
}

impl MockConnection {
    fn new(script: Arc<Script>, state: Arc<Mutex<EngineState>>) -> Self {
        let converter = if script.failing_conversions {
            MockConverter::failing()
        } else {
            MockConverter::new()
        };
        Self {
            script,
            state,
            converter,
            execution: None,
            messages: Vec::new(),
            database: None,
            closed: false,
        }
    }

    /// The currently selected database.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    fn current_set(&self) -> Option<&MockResultSet> {
        self.execution.as_ref()?.current.as_ref()
    }

    fn current_row(&self) -> Option<&[MockCell]> {
        let execution = self.execution.as_ref()?;
        let set = execution.current.as_ref()?;
        set.rows.get(execution.row?).map(Vec::as_slice)
    }
}

impl Convert for MockConnection {
    fn convert(
        &self,
        from: TypeId,
        src: &[u8],
        to: TypeId,
        dst: &mut [u8],
    ) -> Result<usize, EngineError> {
        self.converter.convert(from, src, to, dst)
    }

    fn date_crack(&self, value: &[u8; LEGACY_DATETIME_SIZE]) -> Result<DateRecord, EngineError> {
        self.converter.date_crack(value)
    }
}

impl EngineConnection for MockConnection {
    fn use_database(&mut self, name: &str) -> Result<(), EngineError> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        self.state.lock().stats.databases_used.push(name.to_owned());
        if let Some(ref allowed) = self.script.databases {
            if !allowed.contains(name) {
                self.messages.push(ServerMessage::error(
                    911,
                    16,
                    format!("Database '{name}' does not exist."),
                ));
                return Err(EngineError::DatabaseUnavailable(name.to_owned()));
            }
        }
        self.database = Some(name.to_owned());
        Ok(())
    }

    fn submit(&mut self, sql: &str) -> Result<(), EngineError> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        // A new submission abandons an undrained command; both count as
        // running until the old one is dropped.
        let abandoned = self.execution.take().is_some_and(|e| !e.finished);
        {
            let mut state = self.state.lock();
            state.stats.submitted.push(sql.to_owned());
            state.command_started();
            if abandoned {
                state.command_finished();
            }
        }

        let Some(response) = self.script.response(sql).cloned() else {
            self.state.lock().command_finished();
            return Err(EngineError::SubmitFailed(format!(
                "no mock response for {sql:?}"
            )));
        };

        self.messages.extend(response.messages);
        if let Some(rejection) = response.rejection {
            self.state.lock().command_finished();
            let text = rejection.message.clone();
            self.messages.push(rejection);
            return Err(EngineError::SubmitFailed(text));
        }

        self.execution = Some(Execution {
            steps: response.steps.into(),
            current: None,
            row: None,
            rows_affected: response.rows_affected,
            finished: false,
        });
        Ok(())
    }

    fn next_result(&mut self) -> ResultStatus {
        if !self.script.latency.is_zero() {
            std::thread::sleep(self.script.latency);
        }
        let Some(execution) = self.execution.as_mut() else {
            return ResultStatus::NoMoreResults;
        };
        execution.current = None;
        execution.row = None;
        let status = match execution.steps.pop_front() {
            Some(MockStep::ResultSet(set)) => {
                execution.current = Some(set);
                return ResultStatus::More;
            }
            Some(MockStep::Failure(message)) => {
                execution.steps.clear();
                self.messages.push(message);
                ResultStatus::Failed
            }
            None => ResultStatus::NoMoreResults,
        };
        if !execution.finished {
            execution.finished = true;
            self.state.lock().command_finished();
        }
        status
    }

    fn rows_affected(&self) -> i64 {
        match self.execution.as_ref() {
            Some(execution) => execution
                .current
                .as_ref()
                .map_or(execution.rows_affected, |set| set.rows_affected),
            None => -1,
        }
    }

    fn column_count(&self) -> usize {
        self.current_set().map_or(0, |set| set.columns.len())
    }

    fn column_name(&self, index: usize) -> &str {
        self.current_set()
            .and_then(|set| set.columns.get(index))
            .map_or("", |column| column.name.as_str())
    }

    fn column_type(&self, index: usize) -> i32 {
        self.current_set()
            .and_then(|set| set.columns.get(index))
            .map_or(0, |column| column.tag)
    }

    fn column_length(&self, index: usize) -> i32 {
        self.current_set()
            .and_then(|set| set.columns.get(index))
            .map_or(0, |column| column.length)
    }

    fn next_row(&mut self) -> RowStatus {
        let Some(execution) = self.execution.as_mut() else {
            return RowStatus::NoMoreRows;
        };
        let Some(set) = execution.current.as_ref() else {
            return RowStatus::NoMoreRows;
        };
        let next = execution.row.map_or(0, |row| row + 1);
        if set.fail_at_row == Some(next) {
            execution.steps.clear();
            if !execution.finished {
                execution.finished = true;
                self.state.lock().command_finished();
            }
            self.messages
                .push(ServerMessage::error(8115, 16, "Arithmetic overflow error."));
            return RowStatus::Failed;
        }
        if next < set.rows.len() {
            execution.row = Some(next);
            RowStatus::Row
        } else {
            execution.row = None;
            RowStatus::NoMoreRows
        }
    }

    fn cell(&self, index: usize) -> RawCell<'_> {
        self.current_row()
            .and_then(|row| row.get(index))
            .map_or(RawCell::null(), MockCell::raw)
    }

    fn take_messages(&mut self) -> Vec<ServerMessage> {
        std::mem::take(&mut self.messages)
    }
}
