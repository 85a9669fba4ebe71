//! In-process rate limiter

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use tours_core::services::{RateLimitDecision, RateLimiterTrait};

use super::decide;

/// Entries kept before expired windows are swept
const SWEEP_THRESHOLD: usize = 10_000;

struct Window {
    started: Instant,
    count: u32,
}

pub struct InMemoryRateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimiter {
    pub fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_seconds),
            windows: Mutex::new(HashMap::new()),
        }
    }

    fn count(&self, key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() >= SWEEP_THRESHOLD {
            let window = self.window;
            windows.retain(|_, entry| now.duration_since(entry.started) < window);
        }

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count = entry.count.saturating_add(1);

        let elapsed = now.duration_since(entry.started);
        let reset_after = self.window.saturating_sub(elapsed).as_secs();
        decide(entry.count, self.max_requests, reset_after)
    }
}

#[async_trait]
impl RateLimiterTrait for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitDecision, String> {
        Ok(self.count(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blocks_after_limit() {
        let limiter = InMemoryRateLimiter::new(2, 60);
        let first = limiter.check("ip").await.unwrap();
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);
        assert!(limiter.check("ip").await.unwrap().allowed);

        let third = limiter.check("ip").await.unwrap();
        assert!(!third.allowed);
        assert_eq!(third.limit, 2);
        assert_eq!(third.reset_after_seconds, 60);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = InMemoryRateLimiter::new(1, 60);
        assert!(limiter.check("a").await.unwrap().allowed);
        assert!(limiter.check("b").await.unwrap().allowed);
        assert!(!limiter.check("a").await.unwrap().allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets() {
        let limiter = InMemoryRateLimiter::new(1, 60);
        assert!(limiter.check("ip").await.unwrap().allowed);
        assert!(!limiter.check("ip").await.unwrap().allowed);

        tokio::time::advance(Duration::from_secs(61)).await;
        let decision = limiter.check("ip").await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 0);
    }
}
