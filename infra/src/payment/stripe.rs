//! Stripe Checkout gateway

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info};

use tours_core::services::{
    CheckoutRequest, CheckoutSession, CompletedCheckout, PaymentGatewayTrait,
};
use tours_shared::config::PaymentConfig;

use super::signature::{parse_checkout_event, verify_signature};

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeError,
}

#[derive(Deserialize)]
struct StripeError {
    message: String,
}

pub struct StripeGateway {
    client: reqwest::Client,
    config: PaymentConfig,
}

impl StripeGateway {
    pub fn new(config: PaymentConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// Form fields for `POST /v1/checkout/sessions`
    fn session_form(&self, request: &CheckoutRequest) -> Vec<(&'static str, String)> {
        vec![
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("success_url", request.success_url.clone()),
            ("cancel_url", request.cancel_url.clone()),
            ("customer_email", request.customer_email.clone()),
            ("client_reference_id", request.tour_id.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            ("line_items[0][price_data][currency]", self.config.currency.clone()),
            (
                "line_items[0][price_data][unit_amount]",
                request.unit_amount().to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                request.tour_name.clone(),
            ),
            (
                "line_items[0][price_data][product_data][description]",
                request.tour_summary.clone(),
            ),
            (
                "line_items[0][price_data][product_data][images][0]",
                request.image_url.clone(),
            ),
        ]
    }
}

#[async_trait]
impl PaymentGatewayTrait for StripeGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, String> {
        let secret_key = self
            .config
            .secret_key
            .as_deref()
            .ok_or_else(|| "Stripe secret key is not configured".to_string())?;

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.config.api_url))
            .bearer_auth(secret_key)
            .form(&self.session_form(request))
            .send()
            .await
            .map_err(|e| format!("Stripe request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<StripeErrorBody>().await {
                Ok(body) => body.error.message,
                Err(_) => status.to_string(),
            };
            error!(status = %status, message = %message, "Stripe rejected checkout session");
            return Err(message);
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| format!("invalid Stripe response: {}", e))?;
        info!(session_id = %session.id, tour_id = %request.tour_id, "checkout session created");
        Ok(session)
    }

    fn parse_completed_checkout(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<Option<CompletedCheckout>, String> {
        let secret = self
            .config
            .webhook_secret
            .as_deref()
            .ok_or_else(|| "Webhook secret is not configured".to_string())?;
        verify_signature(
            payload,
            signature,
            secret,
            self.config.webhook_tolerance_seconds,
            Utc::now().timestamp(),
        )?;
        parse_checkout_event(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::signature_header;

    fn config() -> PaymentConfig {
        PaymentConfig {
            secret_key: Some("sk_test".to_string()),
            webhook_secret: Some("whsec_test".to_string()),
            ..PaymentConfig::default()
        }
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            tour_id: "tour-1".to_string(),
            tour_name: "The Forest Hiker Tour".to_string(),
            tour_summary: "Breathtaking hike".to_string(),
            image_url: "https://natours.dev/img/tours/tour-1-cover.jpg".to_string(),
            price: 397.0,
            customer_email: "lou@example.com".to_string(),
            success_url: "https://natours.dev/my-tours?alert=booking".to_string(),
            cancel_url: "https://natours.dev/tour/the-forest-hiker".to_string(),
        }
    }

    #[test]
    fn test_session_form_uses_cents_and_reference() {
        let gateway = StripeGateway::new(config());
        let form = gateway.session_form(&request());
        let field = |name: &str| {
            form.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
        };

        assert_eq!(field("line_items[0][price_data][unit_amount]").as_deref(), Some("39700"));
        assert_eq!(field("client_reference_id").as_deref(), Some("tour-1"));
        assert_eq!(field("line_items[0][price_data][currency]").as_deref(), Some("usd"));
        assert_eq!(
            field("line_items[0][price_data][product_data][name]").as_deref(),
            Some("The Forest Hiker Tour")
        );
    }

    #[test]
    fn test_webhook_with_fresh_signature_is_parsed() {
        let gateway = StripeGateway::new(config());
        let payload = br#"{"type":"checkout.session.completed","data":{"object":{"id":"cs_1","client_reference_id":"tour-1","customer_email":"lou@example.com","amount_total":39700}}}"#;
        let header = signature_header(payload, "whsec_test", Utc::now().timestamp()).unwrap();

        let checkout = gateway
            .parse_completed_checkout(payload, &header)
            .unwrap()
            .unwrap();
        assert_eq!(checkout.customer_email, "lou@example.com");
    }

    #[test]
    fn test_webhook_without_secret_is_rejected() {
        let gateway = StripeGateway::new(PaymentConfig::default());
        assert!(gateway.parse_completed_checkout(b"{}", "t=1,v1=00").is_err());
    }
}
