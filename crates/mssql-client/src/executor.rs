//! Result materialization.
//!
//! [`execute`] submits one command and drains everything the engine
//! produces for it: every result set, every row, every cell. Cells are
//! decoded as soon as the cursor lands on a row, because the engine's row
//! buffer is only valid until the next advance.

use std::sync::Arc;

use mssql_types::decode_cell;
use tds_engine::{EngineConnection, EngineError, ResultStatus, RowStatus, ServerMessage};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::instrumentation::{SanitizationConfig, execute_span};
use crate::result::{ExecutionResult, Table};
use crate::row::{ColMetaData, Column, Row};
use crate::state::ExecState;

/// Execute a command and materialize all of its results.
///
/// The caller must hold exclusive access to the connection for the whole
/// call; [`crate::Client`] guarantees this with a mutex.
///
/// # Errors
///
/// - [`Error::CommandRejected`] if the engine refuses the command.
/// - [`Error::CommandFailed`] if a result set or row fails part-way. Tables
///   read up to that point are carried in the error.
pub fn execute<C>(conn: &mut C, sql: &str) -> Result<ExecutionResult>
where
    C: EngineConnection + ?Sized,
{
    execute_with(conn, sql, &SanitizationConfig::default())
}

/// [`execute`] with explicit statement sanitization for the tracing span.
pub fn execute_with<C>(
    conn: &mut C,
    sql: &str,
    sanitization: &SanitizationConfig,
) -> Result<ExecutionResult>
where
    C: EngineConnection + ?Sized,
{
    let span = execute_span(sql, sanitization);
    let _guard = span.enter();

    let mut state = ExecState::Idle;
    let mut result = ExecutionResult::new();

    if let Err(e) = conn.submit(sql) {
        let messages = conn.take_messages();
        log_messages(&messages);
        return Err(Error::CommandRejected(describe_failure(&messages, Some(&e))));
    }
    transition(&mut state, ExecState::ResultsPending);

    let mut saw_result_set = false;
    let failure = loop {
        match conn.next_result() {
            ResultStatus::More => {
                saw_result_set = true;
                transition(&mut state, ExecState::RowsPending);

                let (table, completed) = read_table(conn);
                let row_count = table.len();
                let column_count = table.columns().len();
                result.tables.push(table);

                if !completed {
                    break true;
                }

                let reported = conn.rows_affected();
                result.record_rows_affected(reported);
                debug!(
                    columns = column_count,
                    rows = row_count,
                    rows_affected = reported,
                    "result set complete"
                );
                transition(&mut state, ExecState::ResultsPending);
            }
            ResultStatus::NoMoreResults => break false,
            ResultStatus::Failed => break true,
        }
    };
    transition(&mut state, ExecState::AllDone);

    if !saw_result_set && !failure {
        result.record_rows_affected(conn.rows_affected());
    }

    result.messages = conn.take_messages();
    log_messages(&result.messages);
    span.record("db.rows_affected", result.rows_affected);

    if failure {
        let message = describe_failure(&result.messages, None);
        debug!(
            tables = result.tables.len(),
            error = %message,
            "command failed with partial results"
        );
        return Err(Error::CommandFailed {
            message,
            partial: Box::new(result),
        });
    }

    debug!(
        tables = result.tables.len(),
        rows_affected = result.rows_affected,
        "command complete"
    );
    Ok(result)
}

/// Read the current result set.
///
/// Returns the table and whether the engine reached the end of its rows.
/// On a row failure the rows read so far are still returned.
fn read_table<C>(conn: &mut C) -> (Table, bool)
where
    C: EngineConnection + ?Sized,
{
    let column_count = conn.column_count();
    let metadata = Arc::new(ColMetaData::new(
        (0..column_count)
            .map(|i| {
                Column::new(
                    conn.column_name(i),
                    i,
                    conn.column_type(i),
                    conn.column_length(i),
                )
            })
            .collect(),
    ));

    let mut rows = Vec::new();
    let completed = loop {
        match conn.next_row() {
            RowStatus::Row => {
                // Statements without columns still have to be drained.
                if column_count == 0 {
                    continue;
                }
                let values = metadata
                    .columns
                    .iter()
                    .map(|column| decode_cell(&*conn, column.type_tag, conn.cell(column.index)))
                    .collect();
                rows.push(Row::new(Arc::clone(&metadata), values));
            }
            RowStatus::NoMoreRows => break true,
            RowStatus::Failed => break false,
        }
    };

    (Table::new(metadata, rows), completed)
}

fn transition(state: &mut ExecState, next: ExecState) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal transition {state} -> {next}"
    );
    trace!(from = %state, to = %next, "exec state");
    *state = next;
}

fn log_messages(messages: &[ServerMessage]) {
    for message in messages {
        if message.is_error() {
            warn!(
                number = message.number,
                severity = message.severity,
                "{}",
                message.message
            );
        } else {
            debug!(number = message.number, "{}", message.message);
        }
    }
}

/// Human-readable failure text from the server's error messages.
fn describe_failure(messages: &[ServerMessage], engine: Option<&EngineError>) -> String {
    let errors: Vec<String> = messages
        .iter()
        .filter(|m| m.is_error())
        .map(ToString::to_string)
        .collect();

    if !errors.is_empty() {
        return errors.join("; ");
    }
    match engine {
        Some(e) => e.to_string(),
        None => "the server reported a failure without a message".to_string(),
    }
}
