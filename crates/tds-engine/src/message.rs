//! Server messages collected by the engine.
//!
//! A dblib-style engine reports informational and error messages through
//! installed handlers. Engines implementing [`crate::EngineConnection`]
//! buffer them and hand them over on request instead of broadcasting them.

/// Kind of server message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Informational message (severity 10 or less).
    Info,
    /// Error message.
    Error,
}

/// A message raised by the server or the engine while a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerMessage {
    /// Message kind.
    pub kind: MessageKind,
    /// Message number.
    pub number: i32,
    /// Severity class (0-25).
    pub severity: u8,
    /// Message state.
    pub state: u8,
    /// Message text.
    pub message: String,
    /// Server name, if reported.
    pub server: Option<String>,
    /// Procedure name, if the message came from a stored procedure.
    pub procedure: Option<String>,
    /// Line number in the batch or procedure.
    pub line: u32,
}

impl ServerMessage {
    /// Create an informational message.
    pub fn info(number: i32, message: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            number,
            severity: 0,
            state: 1,
            message: message.into(),
            server: None,
            procedure: None,
            line: 0,
        }
    }

    /// Create an error message with the given severity.
    pub fn error(number: i32, severity: u8, message: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            number,
            severity,
            state: 1,
            message: message.into(),
            server: None,
            procedure: None,
            line: 0,
        }
    }

    /// Check if this is an error message.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

impl std::fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Msg {}, Level {}, State {}",
            self.number, self.severity, self.state
        )?;
        if let Some(ref procedure) = self.procedure {
            write!(f, ", Procedure {procedure}")?;
        }
        if self.line > 0 {
            write!(f, ", Line {}", self.line)?;
        }
        write!(f, ": {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let mut msg = ServerMessage::error(208, 16, "Invalid object name 'nope'.");
        msg.line = 1;
        assert_eq!(
            msg.to_string(),
            "Msg 208, Level 16, State 1, Line 1: Invalid object name 'nope'."
        );
        assert!(msg.is_error());
        assert!(!ServerMessage::info(5701, "Changed database context").is_error());
    }
}
