//! # mssql-types
//!
//! Decoding of SQL Server and Sybase column values into Rust types.
//!
//! A protocol engine reports each column with a wire type tag and hands
//! over each cell as raw bytes. This crate classifies the tag through a
//! static catalog and decodes the cell into a [`SqlValue`]:
//!
//! - fixed-width integers, floats and bits are read directly
//! - character data is decoded as UTF-8, falling back to Windows-1252
//! - binary data is copied verbatim
//! - legacy datetimes are cracked into calendar fields by the engine
//! - extended date/time types and the decimal/money family are rendered
//!   to text by the engine and parsed
//! - GUIDs are read in the server's mixed-endian layout
//!
//! ## Type Mappings
//!
//! | SQL Server Type | Rust Type |
//! |-----------------|-----------|
//! | `BIT` | `bool` |
//! | `TINYINT` | `u8` |
//! | `SMALLINT` | `i16` |
//! | `INT` | `i32` |
//! | `BIGINT` | `i64` |
//! | `REAL` | `f32` |
//! | `FLOAT` | `f64` |
//! | `DECIMAL`/`NUMERIC`/`MONEY` | `rust_decimal::Decimal` |
//! | `CHAR`/`VARCHAR`/`NVARCHAR`/`TEXT` | `String` |
//! | `BINARY`/`VARBINARY`/`IMAGE` | `bytes::Bytes` |
//! | `DATE` | `chrono::NaiveDate` |
//! | `TIME` | `chrono::NaiveTime` |
//! | `DATETIME`/`DATETIME2` | `chrono::NaiveDateTime` |
//! | `DATETIMEOFFSET` | `chrono::DateTime<FixedOffset>` |
//! | `UNIQUEIDENTIFIER` | `uuid::Uuid` |

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod decode;
pub mod error;
pub mod fixed_point;
pub mod from_sql;
pub mod guid;
pub mod scalar;
pub mod temporal;
pub mod text;
pub mod value;

pub use catalog::{CatalogEntry, DecodeStrategy, classify, lookup};
pub use decode::{decode_cell, try_decode_cell};
pub use error::TypeError;
pub use from_sql::FromSql;
pub use temporal::{TemporalFormat, parse_temporal};
pub use value::SqlValue;
