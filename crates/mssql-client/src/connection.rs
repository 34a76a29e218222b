//! Owned engine connections.
//!
//! A [`Connection`] owns both engine records a session needs: the login
//! record and the open connection. Dropping it (or calling
//! [`Connection::close`]) closes the connection and then frees the login
//! record, exactly once, including when [`Connection::open`] fails half-way.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tds_engine::{Engine, EngineConnection, EngineError, LoginField};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::executor;
use crate::instrumentation::{SanitizationConfig, connect_span};
use crate::result::ExecutionResult;

/// Once-only engine initialisation.
///
/// Concurrent first callers block until the winner finishes. A failed
/// initialisation leaves the gate closed, so the next caller tries again.
#[derive(Debug, Default)]
pub struct InitGate {
    done: OnceCell<()>,
}

impl InitGate {
    /// Create a gate that has not run yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            done: OnceCell::new(),
        }
    }

    /// Initialise `engine` unless this gate already did.
    pub fn ensure<E: Engine + ?Sized>(&self, engine: &E) -> std::result::Result<(), EngineError> {
        self.done
            .get_or_try_init(|| {
                info!("initialising protocol engine");
                engine.init()
            })
            .map(|_| ())
    }

    /// Check whether initialisation has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.done.get().is_some()
    }
}

/// Process-wide gate used by [`Connection::open`].
static ENGINE_INIT: InitGate = InitGate::new();

/// An open session with the server.
///
/// The engine's connection handle allows one command at a time; `&mut self`
/// on [`Connection::execute`] enforces that for direct use, and
/// [`crate::Client`] serializes shared use.
pub struct Connection<E: Engine> {
    engine: Arc<E>,
    login: Option<E::Login>,
    handle: Option<E::Connection>,
    server: String,
    database: Option<String>,
    sanitization: SanitizationConfig,
}

impl<E: Engine> Connection<E> {
    /// Open a connection, initialising the engine first if this process
    /// has not done so yet.
    pub fn open(engine: Arc<E>, config: &Config) -> Result<Self> {
        Self::open_with_gate(engine, config, &ENGINE_INIT)
    }

    /// [`Connection::open`] with an explicit initialisation gate.
    pub fn open_with_gate(engine: Arc<E>, config: &Config, gate: &InitGate) -> Result<Self> {
        let server = config.server_address();
        let span = connect_span(&server, config.database.as_deref());
        let _guard = span.enter();

        gate.ensure(engine.as_ref())?;

        let login = engine.new_login()?;
        // From here on, Drop releases whatever has been allocated.
        let mut conn = Self {
            engine,
            login: Some(login),
            handle: None,
            server,
            database: None,
            sanitization: SanitizationConfig::default(),
        };

        conn.apply_login_fields(config)?;
        conn.engine
            .set_timeouts(config.timeouts.login_timeout, config.timeouts.command_timeout)?;

        let handle = match conn.login.as_ref() {
            Some(login) => conn.engine.open(login, &conn.server)?,
            None => return Err(Error::ConnectionNotReady),
        };
        conn.handle = Some(handle);

        if let Some(database) = &config.database {
            conn.use_database(database)?;
        }

        info!(server = %conn.server, database = ?conn.database, "connection open");
        Ok(conn)
    }

    fn apply_login_fields(&mut self, config: &Config) -> Result<()> {
        let Some(login) = self.login.as_mut() else {
            return Err(Error::ConnectionNotReady);
        };
        let fields = [
            (LoginField::User, config.user.as_str()),
            (LoginField::Password, config.password.as_str()),
            (LoginField::AppName, config.application_name.as_str()),
            (LoginField::Charset, config.charset.as_str()),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                continue;
            }
            self.engine.set_login_field(login, field, value)?;
        }
        Ok(())
    }

    /// Replace the sanitization applied to statements in tracing spans.
    #[must_use]
    pub fn with_sanitization(mut self, sanitization: SanitizationConfig) -> Self {
        self.sanitization = sanitization;
        self
    }

    /// Execute a command and materialize its results.
    pub fn execute(&mut self, sql: &str) -> Result<ExecutionResult> {
        let handle = self.handle.as_mut().ok_or(Error::ConnectionNotReady)?;
        executor::execute_with(handle, sql, &self.sanitization)
    }

    /// Switch the current database.
    pub fn use_database(&mut self, name: &str) -> Result<()> {
        let handle = self.handle.as_mut().ok_or(Error::ConnectionNotReady)?;
        if let Err(e) = handle.use_database(name) {
            for message in handle.take_messages() {
                debug!(number = message.number, "{}", message.message);
            }
            return Err(e.into());
        }
        debug!(database = name, "database selected");
        self.database = Some(name.to_string());
        Ok(())
    }

    /// The server string this connection was opened against.
    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// The database last selected through this connection.
    #[must_use]
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Check whether the connection is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Close the connection and free its login record.
    ///
    /// Closing twice is a no-op; later commands fail with
    /// [`Error::ConnectionNotReady`].
    pub fn close(&mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.engine.close(handle);
            info!(server = %self.server, "connection closed");
        }
        if let Some(login) = self.login.take() {
            self.engine.free_login(login);
        }
    }
}

impl<E: Engine> Drop for Connection<E> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<E: Engine> std::fmt::Debug for Connection<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("server", &self.server)
            .field("database", &self.database)
            .field("open", &self.is_open())
            .finish()
    }
}
