//! Process configuration read from `FERMATA_*` environment variables.

use std::net::{AddrParseError, SocketAddr};
use thiserror::Error;
use tracing::Level;

/// Environment variable holding the HTTP listen address.
pub const LISTEN_ADDR_VAR: &str = "FERMATA_LISTEN_ADDR";
/// Environment variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "FERMATA_DATABASE_URL";
/// Environment variable holding the connection pool size.
pub const DB_POOL_SIZE_VAR: &str = "FERMATA_DB_POOL_SIZE";
/// Environment variable holding the log level.
pub const LOG_VAR: &str = "FERMATA_LOG";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_POOL_SIZE: u32 = 8;

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The listen address is not a socket address.
    #[error("{LISTEN_ADDR_VAR} is not a socket address: {value}")]
    InvalidListenAddr {
        /// Raw value read from the environment.
        value: String,
        /// Parser error.
        #[source]
        source: AddrParseError,
    },

    /// The pool size is not a positive integer.
    #[error("{DB_POOL_SIZE_VAR} must be a positive integer, got '{0}'")]
    InvalidPoolSize(String),

    /// The log level is not recognised.
    #[error("{LOG_VAR} must be one of error, warn, info, debug, trace; got '{0}'")]
    InvalidLogLevel(String),
}

/// Runtime configuration for the `fermata` service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    listen_addr: SocketAddr,
    database_url: Option<String>,
    db_pool_size: u32,
    log_level: Level,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns the value for a
    /// variable name if set.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let raw_addr = read(LISTEN_ADDR_VAR).unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());
        let listen_addr = raw_addr
            .parse()
            .map_err(|source| ConfigError::InvalidListenAddr {
                value: raw_addr.clone(),
                source,
            })?;

        let db_pool_size = read(DB_POOL_SIZE_VAR)
            .map(parse_pool_size)
            .transpose()?
            .unwrap_or(DEFAULT_DB_POOL_SIZE);
        let log_level = read(LOG_VAR)
            .map(parse_level)
            .transpose()?
            .unwrap_or(Level::INFO);

        Ok(Self {
            listen_addr,
            database_url: read(DATABASE_URL_VAR),
            db_pool_size,
            log_level,
        })
    }

    /// Returns the HTTP listen address.
    #[must_use]
    pub const fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }

    /// Returns the `PostgreSQL` URL; `None` selects the in-memory store.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// Returns the maximum number of pooled database connections.
    #[must_use]
    pub const fn db_pool_size(&self) -> u32 {
        self.db_pool_size
    }

    /// Returns the maximum log level.
    #[must_use]
    pub const fn log_level(&self) -> Level {
        self.log_level
    }
}

fn parse_pool_size(raw: String) -> Result<u32, ConfigError> {
    match raw.parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidPoolSize(raw)),
    }
}

fn parse_level(raw: String) -> Result<Level, ConfigError> {
    match raw.to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" | "warning" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(ConfigError::InvalidLogLevel(raw)),
    }
}
