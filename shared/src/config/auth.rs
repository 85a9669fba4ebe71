//! Authentication configuration

use serde::{Deserialize, Serialize};

use super::{env_opt, env_or};

const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

/// JWT and session cookie configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret key for HS256 signing
    pub secret: String,

    /// Token lifetime in seconds
    pub expires_in_seconds: i64,

    /// Lifetime of the `jwt` cookie in days
    pub cookie_expires_in_days: i64,

    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            expires_in_seconds: 90 * 86400,
            cookie_expires_in_days: 90,
            issuer: String::from("natours"),
        }
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Reads `JWT_SECRET`, `JWT_EXPIRES_IN` (e.g. `90d`) and `JWT_COOKIE_EXPIRES_IN` (days)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let expires_in_seconds = env_opt("JWT_EXPIRES_IN")
            .and_then(|raw| parse_duration_seconds(&raw))
            .unwrap_or(defaults.expires_in_seconds);

        Self {
            secret: env_opt("JWT_SECRET").unwrap_or(defaults.secret),
            expires_in_seconds,
            cookie_expires_in_days: env_or("JWT_COOKIE_EXPIRES_IN", defaults.cookie_expires_in_days),
            issuer: env_opt("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }

    pub fn with_expires_in_seconds(mut self, seconds: i64) -> Self {
        self.expires_in_seconds = seconds;
        self
    }

    pub fn with_cookie_expires_in_days(mut self, days: i64) -> Self {
        self.cookie_expires_in_days = days;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Parses durations such as `90d`, `12h`, `30m`, `45s` or a bare number of seconds
pub fn parse_duration_seconds(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], Some(c.to_ascii_lowercase())),
        _ => (raw, None),
    };

    let value: i64 = digits.trim().parse().ok()?;
    if value <= 0 {
        return None;
    }

    let multiplier = match unit {
        None | Some('s') => 1,
        Some('m') => 60,
        Some('h') => 3600,
        Some('d') => 86400,
        Some('w') => 7 * 86400,
        Some(_) => return None,
    };

    value.checked_mul(multiplier)
}
