use async_trait::async_trait;

use super::message::EmailMessage;

/// Trait for email transport integration
#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    /// Delivers one message; the error string is logged, never shown to clients
    async fn send(&self, message: EmailMessage) -> Result<(), String>;
}
