//! # mssql-testing
//!
//! Test infrastructure for the client and the value decoders.
//!
//! ## Features
//!
//! - Scripted in-memory protocol engine for unit tests (no server required)
//! - dblib-faithful conversion and date-crack routines
//! - Cell fixtures in the engine's byte layouts
//!
//! ## Mock Engine Example
//!
//! ```rust
//! use mssql_testing::fixtures;
//! use mssql_testing::mock_engine::{MockColumn, MockEngine, MockResponse};
//!
//! let engine = MockEngine::builder()
//!     .with_response(
//!         "SELECT id, name FROM users WHERE id = 1",
//!         MockResponse::rows(
//!             vec![MockColumn::int("id"), MockColumn::nvarchar("name", 50)],
//!             vec![vec![fixtures::int4(1), fixtures::text("Alice")]],
//!         ),
//!     )
//!     .with_response("UPDATE users SET active = 1", MockResponse::affected(3))
//!     .build();
//! # let _ = engine;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod converter;
pub mod fixtures;
pub mod mock_engine;

pub use converter::MockConverter;
pub use mock_engine::{
    EngineStats, MockCell, MockColumn, MockConnection, MockEngine, MockEngineBuilder, MockLogin,
    MockResponse, MockResultSet,
};
