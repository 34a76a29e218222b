//! Connection string parsing edge cases.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use mssql_client::{Config, Error};

// ============================================================================
// Basic Parsing
// ============================================================================

#[test]
fn test_empty_connection_string() {
    let config = Config::from_connection_string("").unwrap();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 1433);
    assert_eq!(config.database, None);
}

#[test]
fn test_whitespace_and_stray_semicolons() {
    assert!(Config::from_connection_string("   \t\n  ").is_ok());
    assert!(Config::from_connection_string(";").is_ok());
    assert!(Config::from_connection_string(";;;").is_ok());
}

#[test]
fn test_key_without_value() {
    let config = Config::from_connection_string("Server=").unwrap();
    assert_eq!(config.host, "");
}

#[test]
fn test_missing_equals_sign() {
    assert!(matches!(
        Config::from_connection_string("Serverlocalhost;"),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_equals_inside_value() {
    let config =
        Config::from_connection_string("Server=localhost;Password=pass=word=with=equals;").unwrap();
    assert_eq!(config.password, "pass=word=with=equals");
}

#[test]
fn test_alternative_key_names() {
    for conn_str in ["Server=host1;", "Data Source=host1;", "Host=host1;", "SERVER=host1"] {
        assert_eq!(Config::from_connection_string(conn_str).unwrap().host, "host1");
    }
    for conn_str in ["Database=db1;", "Initial Catalog=db1;"] {
        let config = Config::from_connection_string(conn_str).unwrap();
        assert_eq!(config.database.as_deref(), Some("db1"));
    }
    for conn_str in ["User Id=user1;", "UID=user1;", "User=user1;"] {
        assert_eq!(Config::from_connection_string(conn_str).unwrap().user, "user1");
    }
    for conn_str in ["Password=pass1;", "PWD=pass1;"] {
        assert_eq!(
            Config::from_connection_string(conn_str).unwrap().password,
            "pass1"
        );
    }
}

// ============================================================================
// Server Address
// ============================================================================

#[test]
fn test_server_ipv4_with_port() {
    let config = Config::from_connection_string("Server=192.168.1.100,1434;").unwrap();
    assert_eq!(config.host, "192.168.1.100");
    assert_eq!(config.port, 1434);
    assert_eq!(config.server_address(), "192.168.1.100:1434");
}

#[test]
fn test_separate_port_key() {
    let config = Config::from_connection_string("Server=db;Port=2433").unwrap();
    assert_eq!(config.server_address(), "db:2433");
}

#[test]
fn test_named_instance_ignores_port() {
    let config = Config::from_connection_string("Server=myserver\\SQLEXPRESS;Port=9999").unwrap();
    assert_eq!(config.server_address(), "myserver\\SQLEXPRESS");
}

#[test]
fn test_invalid_port_number() {
    assert!(Config::from_connection_string("Server=localhost,abc;").is_err());
    assert!(Config::from_connection_string("Server=localhost,999999;").is_err());
    assert!(Config::from_connection_string("Port=-1").is_err());
}

// ============================================================================
// Timeouts
// ============================================================================

#[test]
fn test_connect_timeout_parsing() {
    let config = Config::from_connection_string("Connect Timeout=30;").unwrap();
    assert_eq!(config.timeouts.login_timeout, Duration::from_secs(30));

    let config = Config::from_connection_string("Connection Timeout=60;").unwrap();
    assert_eq!(config.timeouts.login_timeout, Duration::from_secs(60));
}

#[test]
fn test_command_timeout_parsing() {
    let config = Config::from_connection_string("Command Timeout=120;").unwrap();
    assert_eq!(config.timeouts.command_timeout, Duration::from_secs(120));
}

#[test]
fn test_invalid_timeout_value() {
    assert!(Config::from_connection_string("Connect Timeout=abc;").is_err());
    assert!(Config::from_connection_string("Connect Timeout=-1;").is_err());
}

// ============================================================================
// Whitespace and Ordering
// ============================================================================

#[test]
fn test_whitespace_around_keys_and_values() {
    let config = Config::from_connection_string("Server = localhost ;").unwrap();
    assert_eq!(config.host, "localhost");
}

#[test]
fn test_unknown_keys_ignored() {
    let config = Config::from_connection_string(
        "Server=localhost;Encrypt=strict;MultipleActiveResultSets=true;Packet Size=8192",
    )
    .unwrap();
    assert_eq!(config.host, "localhost");
}

#[test]
fn test_without_trailing_semicolon() {
    let config = Config::from_connection_string("Server=localhost;Database=test").unwrap();
    assert_eq!(config.database.as_deref(), Some("test"));
}

#[test]
fn test_repeated_keys_last_wins() {
    let config = Config::from_connection_string("Server=first;Server=second").unwrap();
    assert_eq!(config.host, "second");
}

#[test]
fn test_password_aliases_last_wins_and_stays_redacted() {
    let config =
        Config::from_connection_string("Server=db;Password=first;PWD= s3cr=t ;Port=1500").unwrap();
    assert_eq!(config.password, "s3cr=t");

    let rendered = format!("{config:?}");
    assert!(rendered.contains("password: \"[REDACTED]\""));
    assert!(!rendered.contains("s3cr=t"));
    assert_eq!(config.server_address(), "db:1500");
}
