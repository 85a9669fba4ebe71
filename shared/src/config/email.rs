//! Outbound email configuration

use serde::{Deserialize, Serialize};

use super::env_opt;

/// Email transport configuration
///
/// Without an API key the server falls back to a transport that only logs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Sender address
    pub from: String,

    /// Sender display name
    pub from_name: String,

    /// Mail API endpoint (SendGrid v3 compatible)
    pub api_url: String,

    /// Mail API key
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from: String::from("hello@natours.io"),
            from_name: String::from("Natours"),
            api_url: String::from("https://api.sendgrid.com/v3/mail/send"),
            api_key: None,
        }
    }
}

impl EmailConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            from: env_opt("EMAIL_FROM").unwrap_or(defaults.from),
            from_name: env_opt("EMAIL_FROM_NAME").unwrap_or(defaults.from_name),
            api_url: env_opt("EMAIL_API_URL").unwrap_or(defaults.api_url),
            api_key: env_opt("EMAIL_API_KEY"),
        }
    }

    /// `Name <address>` form used in the From header
    pub fn sender(&self) -> String {
        format!("{} <{}>", self.from_name, self.from)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
