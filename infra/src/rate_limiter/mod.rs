//! Fixed-window request counters
//!
//! [`InMemoryRateLimiter`] keeps per-process windows; [`RedisRateLimiter`]
//! shares them across instances with `INCR` + `EXPIRE`.

mod memory;
#[cfg(feature = "redis-cache")]
mod redis_limiter;

pub use memory::InMemoryRateLimiter;
#[cfg(feature = "redis-cache")]
pub use redis_limiter::RedisRateLimiter;

use std::sync::Arc;

use tours_core::services::{RateLimitDecision, RateLimiterTrait};
use tours_shared::config::RateLimitConfig;

/// Builds a decision from the count after this request
pub(crate) fn decide(count: u32, limit: u32, reset_after_seconds: u64) -> RateLimitDecision {
    RateLimitDecision {
        allowed: count <= limit,
        limit,
        remaining: limit.saturating_sub(count),
        reset_after_seconds,
    }
}

/// Picks the limiter for the configuration
///
/// A Redis URL selects the shared limiter; when Redis is unreachable the
/// in-memory limiter is used instead.
pub async fn create_rate_limiter(config: &RateLimitConfig) -> Arc<dyn RateLimiterTrait> {
    #[cfg(feature = "redis-cache")]
    if let Some(url) = &config.redis_url {
        match RedisRateLimiter::connect(url, config.max_requests, config.window_seconds).await {
            Ok(limiter) => return Arc::new(limiter),
            Err(e) => tracing::warn!(
                error = %e,
                "Redis rate limiter unavailable, falling back to in-memory counters"
            ),
        }
    }
    Arc::new(InMemoryRateLimiter::new(config.max_requests, config.window_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_at_and_over_limit() {
        let at = decide(3, 3, 10);
        assert!(at.allowed);
        assert_eq!(at.remaining, 0);

        let over = decide(4, 3, 10);
        assert!(!over.allowed);
        assert_eq!(over.remaining, 0);
        assert_eq!(over.reset_after_seconds, 10);
    }

    #[tokio::test]
    async fn test_factory_without_redis_uses_memory() {
        let config = RateLimitConfig::default().with_max_requests(1);
        let limiter = create_rate_limiter(&config).await;
        assert!(limiter.check("1.2.3.4").await.unwrap().allowed);
        assert!(!limiter.check("1.2.3.4").await.unwrap().allowed);
    }
}
