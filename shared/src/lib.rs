//! Shared utilities and common types for the Natours server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error response bodies and error codes
//! - The JSON response envelope
//! - Validation helpers

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CorsConfig, DatabaseConfig, EmailConfig, Environment, JwtConfig, PaymentConfig,
    RateLimitConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{ApiResponse, ResponseStatus};
pub use utils::validation;
