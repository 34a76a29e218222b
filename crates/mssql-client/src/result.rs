//! Materialized command results.

use std::sync::Arc;

use tds_engine::ServerMessage;

use crate::row::{ColMetaData, Column, Row};

/// Sentinel for "no affected-row count was reported".
pub const UNKNOWN_ROWS_AFFECTED: i64 = -1;

/// One result set of a command.
///
/// Statements that produce no columns (an `UPDATE`, for instance) still
/// yield a table; it simply has no columns and no rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    metadata: Arc<ColMetaData>,
    rows: Vec<Row>,
}

impl Table {
    /// Create a table from its metadata and rows.
    pub fn new(metadata: Arc<ColMetaData>, rows: Vec<Row>) -> Self {
        Self { metadata, rows }
    }

    /// A table with no columns and no rows.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Arc::new(ColMetaData::new(Vec::new())), Vec::new())
    }

    /// Column metadata.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.metadata.columns
    }

    /// Shared column metadata.
    #[must_use]
    pub fn metadata(&self) -> &Arc<ColMetaData> {
        &self.metadata
    }

    /// Rows in server order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Iterate over rows.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Consume the table, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl IntoIterator for Table {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Everything a command produced.
///
/// `rows_affected` is [`UNKNOWN_ROWS_AFFECTED`] unless the engine reported a
/// definite count. The first definite count seeds it (zero included) and
/// later definite counts are added to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    /// Result sets in the order the server produced them.
    pub tables: Vec<Table>,
    /// Aggregate affected-row count, or `-1` when unknown.
    pub rows_affected: i64,
    /// Informational and error messages the server sent during the command.
    pub messages: Vec<ServerMessage>,
}

impl Default for ExecutionResult {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            rows_affected: UNKNOWN_ROWS_AFFECTED,
            messages: Vec::new(),
        }
    }
}

impl ExecutionResult {
    /// An empty result with an unknown row count.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one reported count into the aggregate.
    ///
    /// Negative counts mean "not reported" and leave the aggregate untouched.
    pub fn record_rows_affected(&mut self, count: i64) {
        if count < 0 {
            return;
        }
        if self.rows_affected < 0 {
            self.rows_affected = count;
        } else {
            self.rows_affected = self.rows_affected.saturating_add(count);
        }
    }

    /// The affected-row count, if one was reported.
    #[must_use]
    pub fn affected(&self) -> Option<u64> {
        u64::try_from(self.rows_affected).ok()
    }

    /// The first table, if any.
    #[must_use]
    pub fn first_table(&self) -> Option<&Table> {
        self.tables.first()
    }

    /// Total number of rows across all tables.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(Table::len).sum()
    }

    /// Error-kind messages only.
    pub fn errors(&self) -> impl Iterator<Item = &ServerMessage> {
        self.messages.iter().filter(|m| m.is_error())
    }
}
