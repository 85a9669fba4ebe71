//! Test doubles for the outbound ports

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::email::{EmailMessage, EmailServiceTrait};
use super::payment::{
    CheckoutRequest, CheckoutSession, CompletedCheckout, PaymentGatewayTrait,
};

#[derive(Clone, Default)]
pub struct RecordingEmail {
    pub sent: Arc<Mutex<Vec<EmailMessage>>>,
    pub fail: bool,
}

impl RecordingEmail {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn last(&self) -> Option<EmailMessage> {
        self.sent.lock().unwrap().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailServiceTrait for RecordingEmail {
    async fn send(&self, message: EmailMessage) -> Result<(), String> {
        if self.fail {
            return Err("smtp unavailable".to_string());
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

/// Gateway that accepts the signature `valid` and parses payloads as `CompletedCheckout` JSON
#[derive(Clone, Default)]
pub struct FakeGateway {
    pub requests: Arc<Mutex<Vec<CheckoutRequest>>>,
}

#[async_trait]
impl PaymentGatewayTrait for FakeGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, String> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(CheckoutSession {
            id: "cs_test_1".to_string(),
            url: "https://checkout.example.com/cs_test_1".to_string(),
        })
    }

    fn parse_completed_checkout(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<Option<CompletedCheckout>, String> {
        if signature != "valid" {
            return Err("No signatures found matching the expected signature".to_string());
        }
        serde_json::from_slice(payload)
            .map(Some)
            .map_err(|e| e.to_string())
    }
}
