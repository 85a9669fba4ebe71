//! Configuration for the token service

use tours_shared::JwtConfig;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HS256 signing secret
    pub secret: String,
    /// Token lifetime in seconds
    pub expires_in_seconds: i64,
    /// Value of the `iss` claim, checked on verification
    pub issuer: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            expires_in_seconds: config.expires_in_seconds,
            issuer: config.issuer.clone(),
        }
    }
}
