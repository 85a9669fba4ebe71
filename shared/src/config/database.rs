//! Database configuration module

use serde::{Deserialize, Serialize};

use super::{env_opt, env_or};

/// MySQL connection pool configuration
///
/// `url` is optional: without it the server runs on the in-memory store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of idle connections kept open
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout: u64,

    /// Maximum lifetime of a connection in seconds
    pub max_lifetime: u64,

    /// Run embedded migrations at startup
    #[serde(default)]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            min_connections: 1,
            connect_timeout: 30,
            idle_timeout: 600,
            max_lifetime: 1800,
            run_migrations: false,
        }
    }
}

impl DatabaseConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_opt("DATABASE_URL"),
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: env_or("DATABASE_MIN_CONNECTIONS", defaults.min_connections),
            connect_timeout: env_or("DATABASE_CONNECT_TIMEOUT", defaults.connect_timeout),
            run_migrations: env_or("DATABASE_RUN_MIGRATIONS", defaults.run_migrations),
            ..defaults
        }
    }

    /// Create a new database configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Set the maximum number of connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}
