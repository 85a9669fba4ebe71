//! Redis-backed rate limiter

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::Client;
use tracing::{error, info};

use tours_core::services::{RateLimitDecision, RateLimiterTrait};

use super::decide;
use crate::InfrastructureError;

const KEY_PREFIX: &str = "rate_limit:";

#[derive(Clone)]
pub struct RedisRateLimiter {
    connection: MultiplexedConnection,
    max_requests: u32,
    window_seconds: u64,
}

impl RedisRateLimiter {
    pub async fn connect(
        url: &str,
        max_requests: u32,
        window_seconds: u64,
    ) -> Result<Self, InfrastructureError> {
        let client = Client::open(url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid Redis URL: {}", e)))?;
        let connection = client.get_multiplexed_async_connection().await?;
        info!("Redis rate limiter connected");
        Ok(Self {
            connection,
            max_requests,
            window_seconds,
        })
    }

    async fn count(&self, key: &str) -> redis::RedisResult<(u32, u64)> {
        let mut conn = self.connection.clone();
        let key = format!("{}{}", KEY_PREFIX, key);

        let count: u32 = redis::cmd("INCR").arg(&key).query_async(&mut conn).await?;
        if count == 1 {
            redis::cmd("EXPIRE")
                .arg(&key)
                .arg(self.window_seconds)
                .query_async::<_, ()>(&mut conn)
                .await?;
        }
        let ttl: i64 = redis::cmd("TTL").arg(&key).query_async(&mut conn).await?;
        let reset_after = u64::try_from(ttl).unwrap_or(self.window_seconds);
        Ok((count, reset_after))
    }
}

#[async_trait]
impl RateLimiterTrait for RedisRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitDecision, String> {
        let (count, reset_after) = self.count(key).await.map_err(|e| {
            error!(error = %e, "rate limit counter failed");
            e.to_string()
        })?;
        Ok(decide(count, self.max_requests, reset_after))
    }
}
