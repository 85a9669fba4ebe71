//! Configuration for the authentication service

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Lifetime of a password reset token in minutes
    pub reset_token_ttl_minutes: i64,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: 12,
            reset_token_ttl_minutes: 10,
        }
    }
}

impl AuthServiceConfig {
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Cheapest bcrypt setting, for tests
    pub fn fast() -> Self {
        Self::default().with_bcrypt_cost(4)
    }
}
