//! Database configuration module.
//!
//! Provides configuration structures for database connection management.

use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,
}

/// Errors reading the database configuration from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatabaseConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Parse environment variable `var`, falling back to `default` when unset.
///
/// # Errors
///
/// A set but unparseable value is rejected rather than ignored.
pub fn env_or<T: FromStr>(var: &'static str, default: T) -> Result<T, DatabaseConfigError> {
    parse_or(var, env::var(var).ok(), default)
}

fn parse_or<T: FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, DatabaseConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| DatabaseConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

impl DatabaseConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 10)
    /// - `DB_MIN_CONNECTIONS`: Minimum pool size (default: 1)
    /// - `DB_CONNECTION_TIMEOUT_SECS`: Connection timeout in seconds (default: 10)
    /// - `DB_IDLE_TIMEOUT_SECS`: Idle timeout in seconds (default: 600)
    /// - `DB_MAX_LIFETIME_SECS`: Max lifetime in seconds (default: 1800)
    ///
    /// # Errors
    ///
    /// Fails if `DATABASE_URL` is not set or a numeric variable does not parse
    pub fn from_env() -> Result<Self, DatabaseConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| DatabaseConfigError::Missing("DATABASE_URL"))?;
        Self::pool_from_env(database_url)
    }

    /// Pool settings from the `DB_*` variables, for an already chosen URL
    ///
    /// # Errors
    ///
    /// Fails if a numeric variable is set but does not parse
    pub fn pool_from_env(database_url: String) -> Result<Self, DatabaseConfigError> {
        let defaults = Self::development();
        Ok(Self {
            database_url,
            max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_or("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connection_timeout_secs: env_or(
                "DB_CONNECTION_TIMEOUT_SECS",
                defaults.connection_timeout_secs,
            )?,
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs)?,
            max_lifetime_secs: env_or("DB_MAX_LIFETIME_SECS", defaults.max_lifetime_secs)?,
        })
    }

    /// Create a default configuration for development
    ///
    /// Uses `postgres://postgres@localhost/volley_club` as the database URL
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/volley_club".to_string(),
            max_connections: 10,
            min_connections: 1,
            connection_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}
