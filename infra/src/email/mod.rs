//! Email transports
//!
//! [`HttpEmailService`] delivers through a SendGrid-compatible HTTP API.
//! [`MockEmailService`] logs and records messages instead of sending them.

mod http_email;
mod mock_email;

pub use http_email::HttpEmailService;
pub use mock_email::MockEmailService;

use std::sync::Arc;

use tours_core::services::EmailServiceTrait;
use tours_shared::config::EmailConfig;

/// Picks the transport for the configuration
///
/// Without an API key messages go to the mock transport.
pub fn create_email_service(config: &EmailConfig) -> Arc<dyn EmailServiceTrait> {
    if config.is_configured() {
        Arc::new(HttpEmailService::new(config.clone()))
    } else {
        tracing::warn!("EMAIL_API_KEY not set, using mock email transport");
        Arc::new(MockEmailService::new())
    }
}
