//! Session token issuance and verification
//!
//! Tokens are HS256 JWTs carrying the user id as `sub`. They are handed to
//! clients both in the response body and in the `jwt` cookie.

mod claims;
mod config;
mod service;


pub use claims::Claims;
pub use config::TokenServiceConfig;
pub use service::TokenService;
