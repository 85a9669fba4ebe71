//! Mock payment gateway
//!
//! Checkout sessions are fabricated locally and point straight at the
//! success URL. Webhooks are still signature-checked.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use tours_core::services::{
    CheckoutRequest, CheckoutSession, CompletedCheckout, PaymentGatewayTrait,
};

use super::signature::{parse_checkout_event, verify_signature};

const TOLERANCE_SECONDS: i64 = 300;

#[derive(Clone)]
pub struct MockPaymentGateway {
    webhook_secret: String,
    session_count: Arc<AtomicU64>,
}

impl MockPaymentGateway {
    pub const DEFAULT_WEBHOOK_SECRET: &'static str = "whsec_mock";

    pub fn new(webhook_secret: impl Into<String>) -> Self {
        Self {
            webhook_secret: webhook_secret.into(),
            session_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn webhook_secret(&self) -> &str {
        &self.webhook_secret
    }

    pub fn session_count(&self) -> u64 {
        self.session_count.load(Ordering::SeqCst)
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WEBHOOK_SECRET)
    }
}

#[async_trait]
impl PaymentGatewayTrait for MockPaymentGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, String> {
        self.session_count.fetch_add(1, Ordering::SeqCst);
        let id = format!("cs_mock_{}", Uuid::new_v4().simple());
        info!(
            target: "payment_service",
            provider = "mock",
            session_id = %id,
            amount = request.unit_amount(),
            "checkout session created (mock)"
        );
        Ok(CheckoutSession {
            id,
            url: request.success_url.clone(),
        })
    }

    fn parse_completed_checkout(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<Option<CompletedCheckout>, String> {
        verify_signature(
            payload,
            signature,
            &self.webhook_secret,
            TOLERANCE_SECONDS,
            Utc::now().timestamp(),
        )?;
        parse_checkout_event(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::signature_header;

    #[tokio::test]
    async fn test_session_points_at_success_url() {
        let gateway = MockPaymentGateway::default();
        let request = CheckoutRequest {
            tour_id: "t".to_string(),
            tour_name: "The Sea Explorer".to_string(),
            tour_summary: String::new(),
            image_url: String::new(),
            price: 497.0,
            customer_email: "lou@example.com".to_string(),
            success_url: "http://localhost/my-tours?alert=booking".to_string(),
            cancel_url: "http://localhost/tour/the-sea-explorer".to_string(),
        };

        let session = gateway.create_checkout_session(&request).await.unwrap();
        assert!(session.id.starts_with("cs_mock_"));
        assert_eq!(session.url, request.success_url);
        assert_eq!(gateway.session_count(), 1);
    }

    #[test]
    fn test_unsigned_webhook_is_rejected() {
        let gateway = MockPaymentGateway::default();
        assert!(gateway.parse_completed_checkout(b"{}", "").is_err());
    }

    #[test]
    fn test_signed_webhook_is_accepted() {
        let gateway = MockPaymentGateway::new("whsec_local");
        let payload = br#"{"type":"customer.created","data":{"object":{}}}"#;
        let header = signature_header(payload, "whsec_local", Utc::now().timestamp()).unwrap();
        assert_eq!(gateway.parse_completed_checkout(payload, &header).unwrap(), None);
    }
}
