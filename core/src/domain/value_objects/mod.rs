//! Value objects representing immutable domain concepts.

pub mod auth_session;

// Re-export commonly used types
pub use auth_session::AuthSession;
