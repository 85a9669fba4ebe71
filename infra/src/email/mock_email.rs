//! Mock email transport
//!
//! Logs each message and keeps it in an in-process outbox so development
//! setups and tests can read reset links without a mail provider.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::{info, warn};

use tours_core::services::{EmailMessage, EmailServiceTrait};

#[derive(Clone, Default)]
pub struct MockEmailService {
    outbox: Arc<Mutex<Vec<EmailMessage>>>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Messages sent so far, oldest first
    pub fn outbox(&self) -> Vec<EmailMessage> {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_message(&self) -> Option<EmailMessage> {
        self.outbox().pop()
    }

    pub fn message_count(&self) -> usize {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl EmailServiceTrait for MockEmailService {
    async fn send(&self, message: EmailMessage) -> Result<(), String> {
        if self.simulate_failure {
            warn!(to = %message.to, "mock email transport simulating failure");
            return Err("Simulated email delivery failure".to_string());
        }

        info!(
            target: "email_service",
            provider = "mock",
            to = %message.to,
            subject = %message.subject,
            "email captured (mock)\n{}",
            message.text
        );

        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
        Ok(())
    }
}
