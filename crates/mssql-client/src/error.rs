//! Client error types.

use tds_engine::EngineError;
use thiserror::Error;

use crate::result::ExecutionResult;

/// Errors that can occur during client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The connection is closed or was never opened.
    #[error("connection not ready")]
    ConnectionNotReady,

    /// The engine refused to submit or execute the command.
    #[error("command rejected: {0}")]
    CommandRejected(String),

    /// The command failed part-way through its results.
    ///
    /// Tables gathered before the failure are kept in `partial`.
    #[error("command failed: {message}")]
    CommandFailed {
        /// Human-readable description, built from the server's error messages.
        message: String,
        /// Results materialized before the failure.
        partial: Box<ExecutionResult>,
    },

    /// Engine-level failure (init, login, open, database selection).
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Type conversion error.
    #[error("type error: {0}")]
    Type(#[from] mssql_types::TypeError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The blocking worker running a command panicked or was cancelled.
    #[error("worker task failed: {0}")]
    TaskFailed(String),
}

impl Error {
    /// Check if this error is transient and may succeed on retry.
    ///
    /// The client never retries by itself; this is a hint for callers.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Engine(
                EngineError::OpenFailed { .. } | EngineError::DatabaseUnavailable(_)
            ) | Self::TaskFailed(_)
        )
    }

    /// Results gathered before a command failed, if any.
    #[must_use]
    pub fn partial_result(&self) -> Option<&ExecutionResult> {
        match self {
            Self::CommandFailed { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// Take ownership of the partial results of a failed command.
    #[must_use]
    pub fn into_partial_result(self) -> Option<ExecutionResult> {
        match self {
            Self::CommandFailed { partial, .. } => Some(*partial),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Table;

    #[test]
    fn test_partial_result_only_on_command_failure() {
        let mut partial = ExecutionResult::new();
        partial.tables.push(Table::empty());
        let err = Error::CommandFailed {
            message: "Divide by zero error encountered.".into(),
            partial: Box::new(partial),
        };

        assert_eq!(err.partial_result().map(|r| r.tables.len()), Some(1));
        assert!(Error::ConnectionNotReady.partial_result().is_none());
        assert_eq!(err.into_partial_result().map(|r| r.tables.len()), Some(1));
    }

    #[test]
    fn test_is_transient() {
        let open = Error::Engine(EngineError::OpenFailed {
            server: "db:1433".into(),
            reason: "unreachable".into(),
        });
        assert!(open.is_transient());
        assert!(!Error::CommandRejected("syntax".into()).is_transient());
        assert!(!Error::Config("bad port".into()).is_transient());
    }

    #[test]
    fn test_display() {
        let err = Error::CommandRejected("Msg 102, Level 15, State 1: Incorrect syntax".into());
        assert_eq!(
            err.to_string(),
            "command rejected: Msg 102, Level 15, State 1: Incorrect syntax"
        );
    }
}
