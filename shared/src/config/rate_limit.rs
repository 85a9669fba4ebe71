//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

use super::{env_opt, env_or};

/// Per-IP request limits for the `/api` prefix
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,

    /// Requests allowed per window
    pub max_requests: u32,

    /// Window length in seconds
    pub window_seconds: u64,

    /// Redis URL; the in-process limiter is used when absent
    #[serde(default)]
    pub redis_url: Option<String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_seconds: 3600,
            redis_url: None,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_or("RATE_LIMIT_ENABLED", defaults.enabled),
            max_requests: env_or("RATE_LIMIT_MAX", defaults.max_requests),
            window_seconds: env_or("RATE_LIMIT_WINDOW_SECONDS", defaults.window_seconds),
            redis_url: env_opt("REDIS_URL"),
        }
    }

    pub fn with_max_requests(mut self, max_requests: u32) -> Self {
        self.max_requests = max_requests;
        self
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}
