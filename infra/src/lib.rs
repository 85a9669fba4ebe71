//! # Infrastructure Layer
//!
//! Concrete implementations of the ports defined in `tours_core`:
//!
//! - **Database**: MySQL repositories using SQLx, with a renderer that turns
//!   a `QueryPlan` into parameterized SQL
//! - **Email**: SendGrid-style HTTP transport and a recording mock
//! - **Payment**: Stripe checkout sessions and webhook verification, plus a mock
//! - **Rate limiting**: in-memory and Redis fixed-window counters
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable the Redis rate limiter (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

pub mod email;
pub mod payment;
pub mod rate_limiter;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis error
    #[cfg(feature = "redis-cache")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
