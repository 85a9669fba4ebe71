//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{env_opt, env_or};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Maximum JSON body size in bytes
    #[serde(default = "default_json_limit")]
    pub json_limit: usize,

    /// Public base URL used in emails and payment redirects
    #[serde(default)]
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 3000,
            workers: 0,
            json_limit: default_json_limit(),
            public_url: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_opt("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            workers: env_or("WORKERS", defaults.workers),
            json_limit: env_or("JSON_LIMIT_BYTES", defaults.json_limit),
            public_url: env_opt("PUBLIC_URL"),
        }
    }

    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into());
        self
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Allow credentials (cookies)
    #[serde(default)]
    pub allow_credentials: bool,

    /// Max age for preflight cache in seconds
    #[serde(default = "default_max_age")]
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            allow_credentials: true,
            max_age: default_max_age(),
        }
    }
}

impl CorsConfig {
    /// Permissive configuration for development
    pub fn development() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allow_credentials: true,
            max_age: 3600,
        }
    }

    /// Origins from the comma separated `CORS_ALLOWED_ORIGINS`
    pub fn from_env() -> Self {
        let allowed_origins = env_opt("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            allowed_origins,
            ..Default::default()
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn default_json_limit() -> usize {
    10 * 1024 // 10 KB
}

fn default_max_age() -> usize {
    86400 // 24 hours
}
