//! Client configuration.

use std::time::Duration;

use crate::error::Error;

/// Timeouts handed to the engine before login and command submission.
///
/// The client never enforces these itself: the engine aborts a login or a
/// command that runs past its limit and reports the failure through its
/// normal status codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Time to complete the login sequence (default: 5s).
    pub login_timeout: Duration,
    /// Timeout for a single command (default: 30s, zero means none).
    pub command_timeout: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            login_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_secs(30),
        }
    }
}

impl TimeoutConfig {
    /// Create a new timeout configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the login sequence timeout.
    #[must_use]
    pub fn login_timeout(mut self, timeout: Duration) -> Self {
        self.login_timeout = timeout;
        self
    }

    /// Set the command execution timeout.
    #[must_use]
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Disable the command timeout.
    #[must_use]
    pub fn no_command_timeout(mut self) -> Self {
        self.command_timeout = Duration::ZERO;
        self
    }
}

/// Configuration for opening a connection.
///
/// This struct is marked `#[non_exhaustive]` so new fields can be added
/// without breaking semver. Use [`Config::default()`] or
/// [`Config::from_connection_string()`] to construct instances.
#[derive(Clone)]
#[non_exhaustive]
pub struct Config {
    /// Server hostname or IP address.
    pub host: String,

    /// Server port (default: 1433).
    pub port: u16,

    /// Instance name (for named instances).
    ///
    /// When set, the engine resolves the port through the server browser
    /// and [`Config::port`] is ignored.
    pub instance: Option<String>,

    /// Database selected right after login.
    pub database: Option<String>,

    /// Login user name.
    pub user: String,

    /// Login password.
    pub password: String,

    /// Application name (shown in server management tools).
    pub application_name: String,

    /// Client character set requested at login.
    pub charset: String,

    /// Login and command timeouts.
    pub timeouts: TimeoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1433,
            instance: None,
            database: None,
            user: String::new(),
            password: String::new(),
            application_name: "mssql-client".to_string(),
            charset: "UTF-8".to_string(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("instance", &self.instance)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("application_name", &self.application_name)
            .field("charset", &self.charset)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl Config {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a connection string into configuration.
    ///
    /// Supports ADO.NET-style connection strings:
    /// ```text
    /// Server=localhost;Database=mydb;User Id=sa;Password=secret;
    /// ```
    ///
    /// Keys are case-insensitive. Unknown keys are ignored.
    pub fn from_connection_string(conn_str: &str) -> Result<Self, Error> {
        let mut config = Self::default();

        for part in conn_str.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| Error::Config(format!("invalid key-value: {part}")))?;

            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "server" | "data source" | "host" => {
                    // host,port or host\instance
                    if let Some((host, port)) = value.split_once(',') {
                        config.host = host.trim().to_string();
                        config.port = parse_port(port.trim())?;
                    } else if let Some((host, instance)) = value.split_once('\\') {
                        config.host = host.to_string();
                        config.instance = Some(instance.to_string());
                    } else {
                        config.host = value.to_string();
                    }
                }
                "port" => {
                    config.port = parse_port(value)?;
                }
                "database" | "initial catalog" => {
                    config.database = Some(value.to_string());
                }
                "user id" | "uid" | "user" => {
                    config.user = value.to_string();
                }
                "password" | "pwd" => {
                    config.password = value.to_string();
                }
                "application name" | "app" => {
                    config.application_name = value.to_string();
                }
                "connect timeout" | "connection timeout" => {
                    config.timeouts.login_timeout = parse_seconds(value)?;
                }
                "command timeout" => {
                    config.timeouts.command_timeout = parse_seconds(value)?;
                }
                "charset" | "client charset" => {
                    config.charset = value.to_string();
                }
                _ => {
                    tracing::debug!(key = key, "ignoring unknown connection string option");
                }
            }
        }

        Ok(config)
    }

    /// The server string the engine expects: `host:port`, or
    /// `host\instance` for named instances.
    #[must_use]
    pub fn server_address(&self) -> String {
        match &self.instance {
            Some(instance) => format!("{}\\{}", self.host, instance),
            None => format!("{}:{}", self.host, self.port),
        }
    }

    /// Set the server host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the server port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set a named instance.
    #[must_use]
    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Set the database to select after login.
    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the login user and password.
    #[must_use]
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    /// Set the application name.
    #[must_use]
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    /// Set the client character set.
    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Set the login timeout.
    #[must_use]
    pub fn login_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.login_timeout = timeout;
        self
    }

    /// Set the command timeout.
    #[must_use]
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.command_timeout = timeout;
        self
    }

    /// Set the full timeout configuration.
    #[must_use]
    pub fn timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }
}

fn parse_port(value: &str) -> Result<u16, Error> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("invalid port: {value}")))
}

fn parse_seconds(value: &str) -> Result<Duration, Error> {
    let secs: u64 = value
        .parse()
        .map_err(|_| Error::Config(format!("invalid timeout: {value}")))?;
    Ok(Duration::from_secs(secs))
}
