//! Environment configuration module

use serde::{Deserialize, Serialize};
use std::env;

/// Application environment
///
/// Development exposes error detail to clients; production hides anything
/// that is not an operational error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Get environment from `APP_ENV`, falling back to `NODE_ENV` and `ENVIRONMENT`
    pub fn from_env() -> Self {
        env::var("APP_ENV")
            .or_else(|_| env::var("NODE_ENV"))
            .or_else(|_| env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| String::from("development"))
            .parse()
            .unwrap_or_default()
    }

    /// Default log filter for this environment
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Development => "debug,sqlx=warn",
            Environment::Production => "info,sqlx=warn",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
