//! Payment gateways
//!
//! [`StripeGateway`] talks to the Stripe API. [`MockPaymentGateway`] fakes
//! checkout sessions but verifies webhooks with the same signing scheme.

mod mock_payment;
mod signature;
mod stripe;

pub use mock_payment::MockPaymentGateway;
pub use signature::{parse_checkout_event, signature_header, verify_signature};
pub use stripe::StripeGateway;

use std::sync::Arc;

use tours_core::services::PaymentGatewayTrait;
use tours_shared::config::PaymentConfig;

/// Picks the gateway for the configuration
pub fn create_payment_gateway(config: &PaymentConfig) -> Arc<dyn PaymentGatewayTrait> {
    if config.is_configured() {
        Arc::new(StripeGateway::new(config.clone()))
    } else {
        tracing::warn!("STRIPE_SECRET_KEY not set, using mock payment gateway");
        Arc::new(MockPaymentGateway::new(
            config
                .webhook_secret
                .clone()
                .unwrap_or_else(|| MockPaymentGateway::DEFAULT_WEBHOOK_SECRET.to_string()),
        ))
    }
}
