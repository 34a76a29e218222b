//! Tracing spans for connection and command operations.
//!
//! Span and attribute names follow the OpenTelemetry database semantic
//! conventions so a `tracing-opentelemetry` layer can export them as-is:
//!
//! - `db.system`: "mssql"
//! - `db.name`: Database name
//! - `db.statement`: SQL statement (sanitized)
//! - `db.operation`: Leading keyword (SELECT, INSERT, etc.)
//! - `server.address`: Server string handed to the engine
//!
//! Statements are sanitized before they are attached to a span: string and
//! numeric literals become placeholders and the text is truncated, so values
//! embedded in ad-hoc SQL do not end up in logs.

use tracing::Span;

/// Database system identifier.
pub const DB_SYSTEM: &str = "mssql";

/// Span names for database operations.
pub mod span_names {
    /// Span name for opening a connection.
    pub const CONNECT: &str = "mssql.connect";
    /// Span name for command execution.
    pub const EXECUTE: &str = "mssql.execute";
}

/// Configuration for SQL statement sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationConfig {
    /// Whether to replace literals with the placeholder.
    pub enabled: bool,
    /// Maximum length of statement to record, in bytes.
    pub max_length: usize,
    /// Placeholder to use for sanitized values.
    pub placeholder: String,
}

impl Default for SanitizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_length: 2048,
            placeholder: "?".to_string(),
        }
    }
}

impl SanitizationConfig {
    /// Create a configuration that records statements verbatim.
    #[must_use]
    pub fn no_sanitization() -> Self {
        Self {
            enabled: false,
            max_length: usize::MAX,
            placeholder: String::new(),
        }
    }

    /// Sanitize a SQL statement according to the configuration.
    #[must_use]
    pub fn sanitize(&self, sql: &str) -> String {
        if !self.enabled {
            return truncate(sql, self.max_length);
        }
        truncate(&replace_literals(sql, &self.placeholder), self.max_length)
    }
}

/// Replace string and numeric literals with `placeholder`.
///
/// `N'...'` Unicode literals collapse to a single placeholder, doubled quotes
/// inside a literal are part of it, and bracketed identifiers (`[Order 66]`)
/// are copied untouched.
fn replace_literals(sql: &str, placeholder: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                if out.ends_with(['N', 'n'])
                    && !out[..out.len() - 1].ends_with(|ch: char| ch.is_alphanumeric() || ch == '_')
                {
                    out.pop();
                }
                // Consume through the closing quote; '' is an escaped quote.
                while let Some(ch) = chars.next() {
                    if ch == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            continue;
                        }
                        break;
                    }
                }
                out.push_str(placeholder);
            }
            '[' => {
                out.push(c);
                for ch in chars.by_ref() {
                    out.push(ch);
                    if ch == ']' {
                        break;
                    }
                }
            }
            c if c.is_ascii_digit()
                && !out.ends_with(|ch: char| ch.is_alphanumeric() || ch == '_' || ch == '@') =>
            {
                while chars
                    .peek()
                    .is_some_and(|ch| ch.is_ascii_alphanumeric() || *ch == '.')
                {
                    chars.next();
                }
                out.push_str(placeholder);
            }
            _ => out.push(c),
        }
    }

    out
}

/// Truncate to at most `max_len` bytes on a character boundary.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Extract the operation type from a SQL statement.
#[must_use]
pub fn extract_operation(sql: &str) -> &'static str {
    let keyword = sql
        .split(|c: char| c.is_whitespace() || c == '(' || c == ';')
        .find(|word| !word.is_empty())
        .unwrap_or("");

    match keyword.to_ascii_uppercase().as_str() {
        "SELECT" | "WITH" => "SELECT",
        "INSERT" => "INSERT",
        "UPDATE" => "UPDATE",
        "DELETE" => "DELETE",
        "MERGE" => "MERGE",
        "EXEC" | "EXECUTE" => "EXECUTE",
        "USE" => "USE",
        "BEGIN" => "BEGIN",
        "COMMIT" => "COMMIT",
        "ROLLBACK" => "ROLLBACK",
        "CREATE" => "CREATE",
        "ALTER" => "ALTER",
        "DROP" => "DROP",
        "TRUNCATE" => "TRUNCATE",
        _ => "OTHER",
    }
}

/// Span wrapping one full execute-and-drain cycle.
#[must_use]
pub fn execute_span(sql: &str, config: &SanitizationConfig) -> Span {
    tracing::info_span!(
        "mssql.execute",
        db.system = DB_SYSTEM,
        db.operation = extract_operation(sql),
        db.statement = %config.sanitize(sql),
        db.rows_affected = tracing::field::Empty,
    )
}

/// Span wrapping connection establishment.
#[must_use]
pub fn connect_span(server_address: &str, database: Option<&str>) -> Span {
    tracing::info_span!(
        "mssql.connect",
        db.system = DB_SYSTEM,
        db.name = database.unwrap_or(""),
        server.address = server_address,
    )
}
