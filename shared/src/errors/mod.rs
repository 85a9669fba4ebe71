//! Shared error response structures

use serde::{Deserialize, Serialize};

use crate::types::ResponseStatus;

/// Error body returned by every API endpoint
///
/// `error` and `stack` are only filled in development.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// `fail` for client errors, `error` for server errors
    pub status: ResponseStatus,

    /// Machine readable error code
    pub code: String,

    /// Human readable message
    pub message: String,

    /// Debug rendering of the underlying error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Source chain of the underlying error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorResponse {
    /// Create an error response, choosing `fail` or `error` from the status code
    pub fn new(status_code: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::for_status_code(status_code),
            code: code.into(),
            message: message.into(),
            error: None,
            stack: None,
        }
    }

    /// Attach debug detail (development only)
    pub fn with_debug(mut self, error: impl Into<String>, stack: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self.stack = Some(stack.into());
        self
    }
}

/// Common error codes used across the application
pub mod error_codes {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const CAST_ERROR: &str = "CAST_ERROR";
    pub const DUPLICATE_FIELD: &str = "DUPLICATE_FIELD";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const TOKEN_INVALID: &str = "TOKEN_INVALID";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const RATE_LIMIT_EXCEEDED: &str = "RATE_LIMIT_EXCEEDED";
    pub const PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";
    pub const EMAIL_ERROR: &str = "EMAIL_ERROR";
    pub const PAYMENT_ERROR: &str = "PAYMENT_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_status_code() {
        let client = ErrorResponse::new(404, error_codes::NOT_FOUND, "missing");
        assert_eq!(client.status, ResponseStatus::Fail);

        let server = ErrorResponse::new(500, error_codes::INTERNAL_ERROR, "boom");
        assert_eq!(server.status, ResponseStatus::Error);
    }

    #[test]
    fn test_debug_fields_skipped_when_absent() {
        let body = serde_json::to_value(ErrorResponse::new(400, error_codes::BAD_REQUEST, "bad")).unwrap();
        assert!(body.get("stack").is_none());
        assert!(body.get("error").is_none());
        assert_eq!(body["status"], "fail");

        let body = serde_json::to_value(
            ErrorResponse::new(500, error_codes::INTERNAL_ERROR, "boom").with_debug("Internal", "trace"),
        )
        .unwrap();
        assert_eq!(body["stack"], "trace");
    }
}
