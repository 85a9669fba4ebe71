use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, TokenError};

/// JWT claims of a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Issued at (unix milliseconds)
    #[serde(default)]
    pub iat_ms: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
    pub iss: String,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    pub fn new(
        user_id: Uuid,
        issued_at: DateTime<Utc>,
        expires_in_seconds: i64,
        issuer: &str,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            iat_ms: issued_at.timestamp_millis(),
            exp: issued_at.timestamp() + expires_in_seconds,
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Issue time in milliseconds; tokens without `iat_ms` fall back to `iat`
    pub fn issued_at_millis(&self) -> i64 {
        if self.iat_ms > 0 {
            self.iat_ms
        } else {
            self.iat.saturating_mul(1000)
        }
    }

    pub fn user_id(&self) -> Result<Uuid, DomainError> {
        Uuid::parse_str(&self.sub).map_err(|_| DomainError::Token(TokenError::InvalidToken))
    }
}
