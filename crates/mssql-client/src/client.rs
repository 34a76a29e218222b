//! Async client over a blocking engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tds_engine::Engine;
use tracing::debug;

use crate::config::Config;
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::result::ExecutionResult;

/// Shareable async handle to one connection.
///
/// Engine calls block, so every operation runs on tokio's blocking pool.
/// The connection sits behind a mutex that is held for one whole
/// execute-and-drain cycle: clones of a `Client` can issue commands
/// concurrently, and those commands queue rather than interleave.
///
/// [`Client::is_open`] and [`Client::database`] read a snapshot kept
/// outside that mutex, so they never wait for a running command.
pub struct Client<E: Engine> {
    inner: Arc<Mutex<Connection<E>>>,
    status: Arc<Status>,
}

/// Connection state readable without the connection lock.
#[derive(Debug)]
struct Status {
    open: AtomicBool,
    database: RwLock<Option<String>>,
}

impl<E: Engine> Clone for Client<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            status: Arc::clone(&self.status),
        }
    }
}

impl<E: Engine> Client<E> {
    /// Open a connection on the blocking pool.
    pub async fn connect(engine: Arc<E>, config: Config) -> Result<Self> {
        let connection = blocking(move || Connection::open(engine, &config)).await?;
        Ok(Self::from_connection(connection))
    }

    /// Wrap an already open connection.
    #[must_use]
    pub fn from_connection(connection: Connection<E>) -> Self {
        let status = Status {
            open: AtomicBool::new(connection.is_open()),
            database: RwLock::new(connection.database().map(str::to_string)),
        };
        Self {
            inner: Arc::new(Mutex::new(connection)),
            status: Arc::new(status),
        }
    }

    /// Execute a command and materialize all of its results.
    ///
    /// See [`crate::executor::execute`] for the error contract.
    pub async fn execute(&self, sql: impl Into<String>) -> Result<ExecutionResult> {
        let inner = Arc::clone(&self.inner);
        let sql = sql.into();
        blocking(move || inner.lock().execute(&sql)).await
    }

    /// Switch the current database.
    pub async fn use_database(&self, name: impl Into<String>) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        let status = Arc::clone(&self.status);
        let name = name.into();
        blocking(move || {
            let mut connection = inner.lock();
            connection.use_database(&name)?;
            *status.database.write() = connection.database().map(str::to_string);
            Ok(())
        })
        .await
    }

    /// The database last selected through this client.
    #[must_use]
    pub fn database(&self) -> Option<String> {
        self.status.database.read().clone()
    }

    /// Check whether the underlying connection is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status.open.load(Ordering::Acquire)
    }

    /// Close the connection.
    ///
    /// Waits for any in-flight command. Other clones see
    /// [`Error::ConnectionNotReady`] afterwards.
    pub async fn close(&self) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        let status = Arc::clone(&self.status);
        blocking(move || {
            inner.lock().close();
            status.open.store(false, Ordering::Release);
            Ok(())
        })
        .await?;
        debug!("client closed");
        Ok(())
    }
}

impl<E: Engine> std::fmt::Debug for Client<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::TaskFailed(e.to_string()))?
}
