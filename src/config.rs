//! Server configuration read from the environment.
//!
//! The binary reads every setting exactly once at startup; nothing else in
//! the crate touches the environment. Unset optional variables fall back
//! to development-friendly defaults, while a missing database URL is a
//! hard error because there is no sensible default for it.

use std::env;
use thiserror::Error;

/// Variable naming the address the HTTP server binds to.
pub const BIND_ADDR_ENV: &str = "GANTT_BIND_ADDR";

/// Variable naming the `PostgreSQL` connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Variable naming the connection pool size.
pub const POOL_SIZE_ENV: &str = "GANTT_POOL_SIZE";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 5;

/// Errors raised while assembling the server configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The database URL variable is absent or blank.
    #[error("DATABASE_URL must be set to a PostgreSQL connection string")]
    MissingDatabaseUrl,

    /// The pool size variable is not a positive integer.
    #[error("GANTT_POOL_SIZE must be a positive integer, got '{0}'")]
    InvalidPoolSize(String),
}

/// Settings the server binary runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Number of connections held by the pool.
    pub pool_size: u32,
}

impl AppConfig {
    /// Reads the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when `DATABASE_URL` is
    /// unset or blank, or [`ConfigError::InvalidPoolSize`] when
    /// `GANTT_POOL_SIZE` is set to anything but a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = read_var(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let database_url = read_var(DATABASE_URL_ENV).ok_or(ConfigError::MissingDatabaseUrl)?;
        let pool_size = read_var(POOL_SIZE_ENV).map_or(Ok(DEFAULT_POOL_SIZE), |raw| {
            raw.parse::<u32>()
                .ok()
                .filter(|&size| size > 0)
                .ok_or_else(|| ConfigError::InvalidPoolSize(raw))
        })?;
        Ok(Self {
            bind_addr,
            database_url,
            pool_size,
        })
    }
}

/// Returns the trimmed value of a variable, treating blank as unset.
fn read_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
