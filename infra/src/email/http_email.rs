//! HTTP email transport (SendGrid v3 mail/send payload)

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{error, info};

use tours_core::services::{EmailMessage, EmailServiceTrait};
use tours_shared::config::EmailConfig;

pub struct HttpEmailService {
    client: reqwest::Client,
    config: EmailConfig,
}

impl HttpEmailService {
    pub fn new(config: EmailConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    fn payload(&self, message: &EmailMessage) -> Value {
        json!({
            "personalizations": [{ "to": [{ "email": message.to }] }],
            "from": { "email": self.config.from, "name": self.config.from_name },
            "subject": message.subject,
            "content": [
                { "type": "text/plain", "value": message.text },
                { "type": "text/html", "value": message.html },
            ],
        })
    }
}

#[async_trait]
impl EmailServiceTrait for HttpEmailService {
    async fn send(&self, message: EmailMessage) -> Result<(), String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| "email API key is not configured".to_string())?;

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&self.payload(&message))
            .send()
            .await
            .map_err(|e| format!("email request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "email provider rejected message");
            return Err(format!("email provider returned {}", status));
        }

        info!(
            target: "email_service",
            subject = %message.subject,
            "email sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_carries_both_bodies_and_sender() {
        let service = HttpEmailService::new(EmailConfig::default());
        let message = EmailMessage {
            to: "lou@example.com".to_string(),
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
            text: "Hi".to_string(),
        };

        let payload = service.payload(&message);
        assert_eq!(payload["personalizations"][0]["to"][0]["email"], "lou@example.com");
        assert_eq!(payload["from"]["email"], "hello@natours.io");
        assert_eq!(payload["from"]["name"], "Natours");
        assert_eq!(payload["content"][0]["value"], "Hi");
        assert_eq!(payload["content"][1]["type"], "text/html");
    }

    #[tokio::test]
    async fn test_send_without_key_fails() {
        let service = HttpEmailService::new(EmailConfig::default());
        let message = EmailMessage {
            to: "lou@example.com".to_string(),
            subject: "Hello".to_string(),
            html: String::new(),
            text: String::new(),
        };
        let err = service.send(message).await.unwrap_err();
        assert!(err.contains("not configured"));
    }
}
