#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mssql_client::Config;

const KEYS: &[&str] = &[
    "Server",
    "Data Source",
    "Port",
    "Database",
    "User Id",
    "Password",
    "PWD",
    "App",
    "Connect Timeout",
    "Command Timeout",
    "Charset",
    "Encrypt",
];

#[derive(Debug, Arbitrary)]
struct Input {
    options: Vec<(u8, String)>,
    raw: String,
}

fuzz_target!(|input: Input| {
    let _ = Config::from_connection_string(&input.raw);

    let mut conn_str = String::new();
    let mut password = None;
    for (key, value) in &input.options {
        let key = KEYS[usize::from(*key) % KEYS.len()];
        let value = value.replace(';', "");
        if key == "Password" || key == "PWD" {
            password = Some(value.trim().to_string());
        }
        conn_str.push_str(&format!("{key}={value};"));
    }

    let Ok(config) = Config::from_connection_string(&conn_str) else {
        return;
    };

    // Last occurrence wins, and the password never reaches Debug output.
    if let Some(password) = password {
        assert_eq!(config.password, password);
    }
    assert!(format!("{config:?}").contains("password: \"[REDACTED]\""));

    let address = config.server_address();
    assert!(address.starts_with(config.host.as_str()));
    if config.instance.is_none() {
        assert!(address.ends_with(&format!(":{}", config.port)));
    }
});
