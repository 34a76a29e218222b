//! Async client behaviour over the mock engine.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use mssql_client::{Client, Config, Error, SqlValue};
use mssql_testing::{MockColumn, MockEngine, MockResponse, fixtures};
use tds_engine::EngineError;

fn numbered_engine(count: i32) -> MockEngine {
    numbered_engine_with_latency(count, Duration::ZERO)
}

fn numbered_engine_with_latency(count: i32, latency: Duration) -> MockEngine {
    let mut builder = MockEngine::builder()
        .with_database("master")
        .with_database("sales")
        .with_latency(latency);
    for i in 0..count {
        builder = builder.with_response(
            format!("SELECT {i} AS n"),
            MockResponse::rows(vec![MockColumn::int("n")], vec![vec![fixtures::int4(i)]]),
        );
    }
    builder.build()
}

#[tokio::test]
async fn test_connect_and_execute() {
    let engine = Arc::new(numbered_engine(1));
    let config = Config::new().host("db").database("master");

    let client = Client::connect(Arc::clone(&engine), config).await.unwrap();
    assert!(client.is_open());
    assert_eq!(client.database().as_deref(), Some("master"));

    let result = client.execute("SELECT 0 AS n").await.unwrap();
    assert_eq!(
        result.tables[0].rows()[0].get_raw_by_name("n"),
        Some(&SqlValue::Int(0))
    );
    assert_eq!(engine.stats().last_server.as_deref(), Some("db:1433"));
}

#[tokio::test]
async fn test_connect_failure_surfaces_engine_error() {
    let engine = Arc::new(MockEngine::builder().refusing_connections().build());
    let err = Client::connect(Arc::clone(&engine), Config::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Engine(EngineError::OpenFailed { .. })));
    assert!(err.is_transient());
    assert_eq!(engine.stats().logins_freed, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_commands_queue_on_one_connection() {
    const TASKS: i32 = 32;
    let engine = Arc::new(numbered_engine_with_latency(TASKS, Duration::from_millis(1)));
    let client = Client::connect(Arc::clone(&engine), Config::new()).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..TASKS {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            let result = client.execute(format!("SELECT {i} AS n")).await.unwrap();
            (i, result)
        }));
    }

    for handle in handles {
        let (i, result) = handle.await.unwrap();
        assert_eq!(result.tables.len(), 1);
        assert_eq!(result.tables[0].rows()[0].get::<i32>(0).unwrap(), i);
    }

    let stats = engine.stats();
    assert_eq!(stats.submitted.len(), TASKS as usize);
    assert_eq!(stats.connections_opened, 1);
    assert_eq!(stats.max_in_flight, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_status_accessors_do_not_wait_for_commands() {
    let latency = Duration::from_millis(400);
    let engine = Arc::new(numbered_engine_with_latency(1, latency));
    let client = Client::connect(Arc::clone(&engine), Config::new().database("master"))
        .await
        .unwrap();

    let running = {
        let client = client.clone();
        tokio::spawn(async move { client.execute("SELECT 0 AS n").await })
    };
    while engine.stats().submitted.is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let started = std::time::Instant::now();
    assert!(client.is_open());
    assert_eq!(client.database().as_deref(), Some("master"));
    assert!(started.elapsed() < latency / 4);

    running.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_use_database() {
    let engine = Arc::new(numbered_engine(0));
    let client = Client::connect(Arc::clone(&engine), Config::new()).await.unwrap();
    assert_eq!(client.database(), None);

    client.use_database("sales").await.unwrap();
    assert_eq!(client.database().as_deref(), Some("sales"));

    let err = client.use_database("missing").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Engine(EngineError::DatabaseUnavailable(ref name)) if name == "missing"
    ));
    assert_eq!(client.database().as_deref(), Some("sales"));
}

#[tokio::test]
async fn test_close_affects_every_clone() {
    let engine = Arc::new(numbered_engine(1));
    let client = Client::connect(Arc::clone(&engine), Config::new()).await.unwrap();
    let other = client.clone();

    client.close().await.unwrap();
    assert!(!other.is_open());
    assert!(matches!(
        other.execute("SELECT 0 AS n").await,
        Err(Error::ConnectionNotReady)
    ));

    let stats = engine.stats();
    assert_eq!(stats.connections_closed, 1);
    assert_eq!(stats.logins_freed, 1);
}

#[tokio::test]
async fn test_dropping_last_clone_releases_connection() {
    let engine = Arc::new(numbered_engine(0));
    let client = Client::connect(Arc::clone(&engine), Config::new()).await.unwrap();
    let other = client.clone();

    drop(client);
    assert_eq!(engine.stats().connections_closed, 0);
    drop(other);
    assert_eq!(engine.stats().connections_closed, 1);
}

#[tokio::test]
async fn test_timeouts_are_handed_to_the_engine() {
    let engine = Arc::new(numbered_engine(0));
    let config = Config::new()
        .login_timeout(Duration::from_secs(3))
        .command_timeout(Duration::from_secs(45));

    let _client = Client::connect(Arc::clone(&engine), config).await.unwrap();
    assert_eq!(
        engine.stats().timeouts,
        Some((Duration::from_secs(3), Duration::from_secs(45)))
    );
}

#[tokio::test]
async fn test_failed_command_keeps_partial_results() {
    let engine = Arc::new(
        MockEngine::builder()
            .with_response(
                "EXEC report",
                MockResponse::rows(vec![MockColumn::int("a")], vec![vec![fixtures::int4(1)]])
                    .then_failure(50000, "report aborted"),
            )
            .build(),
    );
    let client = Client::connect(Arc::clone(&engine), Config::new()).await.unwrap();

    let err = client.execute("EXEC report").await.unwrap_err();
    let partial = err.partial_result().expect("partial results");
    assert_eq!(partial.tables.len(), 1);
    assert!(err.to_string().contains("report aborted"));

    // The connection stays usable after a failed command.
    assert!(client.is_open());
}
