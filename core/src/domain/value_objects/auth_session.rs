//! Result of a successful signup, login or password change

use crate::domain::entities::User;

/// A signed session token together with the authenticated user
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Signed JWT
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: User,
}
