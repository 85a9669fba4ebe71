//! Authentication service module
//!
//! This module provides:
//! - Signup, login and session token issuance
//! - Request authorization (`protect`) and its silent page variant
//! - Role restriction
//! - The password reset and password update flows

mod config;
mod password;
mod reset_token;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use password::{hash_password, verify_password};
pub use reset_token::{generate_reset_token, hash_reset_token};
pub use service::{AuthService, SignupInput};
