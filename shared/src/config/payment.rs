//! Payment processor configuration

use serde::{Deserialize, Serialize};

use super::env_opt;

/// Stripe checkout configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentConfig {
    /// Stripe API base URL
    pub api_url: String,

    /// Secret API key; without it the mock gateway is used
    #[serde(default, skip_serializing)]
    pub secret_key: Option<String>,

    /// Signing secret for `checkout.session.completed` webhooks
    #[serde(default, skip_serializing)]
    pub webhook_secret: Option<String>,

    /// ISO currency code for line items
    pub currency: String,

    /// Accepted clock skew for webhook signatures in seconds
    pub webhook_tolerance_seconds: i64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            api_url: String::from("https://api.stripe.com"),
            secret_key: None,
            webhook_secret: None,
            currency: String::from("usd"),
            webhook_tolerance_seconds: 300,
        }
    }
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env_opt("STRIPE_API_URL").unwrap_or(defaults.api_url),
            secret_key: env_opt("STRIPE_SECRET_KEY"),
            webhook_secret: env_opt("STRIPE_WEBHOOK_SECRET"),
            currency: env_opt("STRIPE_CURRENCY").unwrap_or(defaults.currency),
            ..defaults
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }
}
