//! Request rate limiting port

use async_trait::async_trait;

/// Outcome of counting one request against a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Seconds until the current window resets
    pub reset_after_seconds: u64,
}

/// Fixed-window request counter
#[async_trait]
pub trait RateLimiterTrait: Send + Sync {
    /// Counts one request for `key` and reports whether it is within the limit
    async fn check(&self, key: &str) -> Result<RateLimitDecision, String>;
}
