//! # mssql-client
//!
//! Connection lifecycle and result materialization for SQL Server and
//! Sybase, on top of a dblib-style protocol engine.
//!
//! The engine (anything implementing [`tds_engine::Engine`]) does the wire
//! work: login, command submission, cursor movement and value conversion.
//! This crate drives it:
//!
//! - **Connections**: [`Connection`] owns the engine's login and connection
//!   records and releases both on close or drop, including after a partly
//!   failed open. Engine initialisation runs once per process.
//! - **Materialization**: [`executor::execute`] drains every result set and
//!   row of a command into an [`ExecutionResult`], decoding each cell with
//!   [`mssql_types::decode_cell`] before the cursor moves.
//! - **Serialization**: [`Client`] runs commands on tokio's blocking pool
//!   behind a mutex, so concurrent callers queue on the connection.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mssql_client::{Client, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_connection_string(
//!         "Server=localhost;Database=test;User Id=sa;Password=Password123;"
//!     )?;
//!
//!     let client = Client::connect(Arc::new(engine), config).await?;
//!     let result = client.execute("SELECT 1 AS n").await?;
//!
//!     for row in &result.tables[0] {
//!         let n: i32 = row.get_by_name("n")?;
//!         println!("n = {n}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Affected rows
//!
//! [`ExecutionResult::rows_affected`] is `-1` until the engine reports a
//! definite count. The first definite count (zero included) seeds it and
//! later ones are added. A plain `SELECT` whose engine reports no count
//! therefore yields `-1`.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod instrumentation;
pub mod result;
pub mod row;
pub mod state;

pub use client::Client;
pub use config::{Config, TimeoutConfig};
pub use connection::{Connection, InitGate};
pub use error::{Error, Result};
pub use executor::execute;
pub use instrumentation::SanitizationConfig;
pub use mssql_types::{FromSql, SqlValue};
pub use result::{ExecutionResult, Table, UNKNOWN_ROWS_AFFECTED};
pub use row::{ColMetaData, Column, Row};
pub use state::ExecState;
pub use tds_engine::{MessageKind, ServerMessage};
