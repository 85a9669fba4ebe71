//! Database connection pool management

use std::str::FromStr;
use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;

use tours_shared::DatabaseConfig;

use crate::InfrastructureError;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Connects using `config`; the URL is required here
    pub async fn new(config: &DatabaseConfig) -> Result<Self, InfrastructureError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| InfrastructureError::Config("DATABASE_URL is not set".to_string()))?;

        tracing::info!(
            max_connections = config.max_connections,
            "creating database connection pool"
        );

        let connect_options = MySqlConnectOptions::from_str(url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?;

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .max_lifetime(Duration::from_secs(config.max_lifetime))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create database pool: {}", e);
                InfrastructureError::Database(e)
            })?;

        tracing::info!("database connection pool created");
        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Applies the embedded schema migrations
    pub async fn migrate(&self) -> Result<(), InfrastructureError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let value: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(value == 1)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
