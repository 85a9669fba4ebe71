//! Configuration module with business-specific sub-modules
//!
//! Every section can be built from environment variables (`from_env`), has a
//! `Default` suitable for local development, and exposes `with_*` builders
//! for tests.

pub mod auth;
pub mod database;
pub mod email;
pub mod environment;
pub mod payment;
pub mod rate_limit;
pub mod server;

use serde::{Deserialize, Serialize};

pub use auth::{parse_duration_seconds, JwtConfig};
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use environment::Environment;
pub use payment::PaymentConfig;
pub use rate_limit::RateLimitConfig;
pub use server::{CorsConfig, ServerConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub email: EmailConfig,
    pub payment: PaymentConfig,
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            email: EmailConfig::default(),
            payment: PaymentConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment, reading `.env` first
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        let cors = if environment.is_production() {
            CorsConfig::from_env()
        } else {
            CorsConfig::development()
        };

        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            email: EmailConfig::from_env(),
            payment: PaymentConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            cors,
        }
    }

    /// Configuration used by tests: development mode, in-memory storage, mock services
    pub fn for_tests() -> Self {
        Self {
            environment: Environment::Development,
            jwt: JwtConfig::new("test-secret-that-is-long-enough-for-hs256"),
            ..Default::default()
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}

/// Reads an environment variable and parses it, falling back to `default`
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Reads an optional, non-empty environment variable
pub(crate) fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
