use async_trait::async_trait;

use super::types::{CheckoutRequest, CheckoutSession, CompletedCheckout};

/// Trait for payment processor integration
#[async_trait]
pub trait PaymentGatewayTrait: Send + Sync {
    /// Opens a hosted checkout page for one tour
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, String>;

    /// Verifies a webhook delivery and extracts a completed checkout.
    ///
    /// `Ok(None)` means a valid event of a type that creates no booking;
    /// `Err` means the payload or its signature was rejected.
    fn parse_completed_checkout(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<Option<CompletedCheckout>, String>;
}
