//! Basic connection and query example.
//!
//! Runs against the scripted in-memory engine, so no server is needed.
//! Swap `MockEngine` for a real engine binding to talk to SQL Server.
//!
//! # Running
//!
//! ```bash
//! RUST_LOG=debug cargo run --example basic
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use mssql_client::{Client, Config, Error};
use mssql_testing::{MockColumn, MockEngine, MockResponse, fixtures};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let engine = MockEngine::builder()
        .with_response(
            "SELECT id, name FROM users",
            MockResponse::rows(
                vec![MockColumn::int("id"), MockColumn::nvarchar("name", 50)],
                vec![
                    vec![fixtures::int4(1), fixtures::text("Alice")],
                    vec![fixtures::int4(2), fixtures::text("Bob")],
                ],
            ),
        )
        .with_response("UPDATE users SET active = 1", MockResponse::affected(2))
        .build();

    let config = Config::from_connection_string(
        "Server=localhost;Database=master;User Id=sa;Password=Password123!;App=basic-example",
    )?;

    let client = Client::connect(Arc::new(engine), config).await?;

    let result = client.execute("SELECT id, name FROM users").await?;
    for row in &result.tables[0] {
        let id: i32 = row.get_by_name("id")?;
        let name: String = row.get_by_name("name")?;
        println!("User {id}: {name}");
    }

    let result = client.execute("UPDATE users SET active = 1").await?;
    println!("Rows affected: {}", result.rows_affected);

    client.close().await?;
    Ok(())
}
