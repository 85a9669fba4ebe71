//! Domain-specific error types and error handling.

mod types;


pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
///
/// Every variant except `Internal` describes an expected failure whose
/// message is safe to show to a client.
#[derive(Error, Debug)]
pub enum DomainError {
    /// One or more field rules failed; messages are client facing
    #[error("Invalid input data. {}", .messages.join(". "))]
    Validation { messages: Vec<String> },

    /// A value could not be interpreted as the field's type
    #[error("Invalid {field}: {value}.")]
    Cast { field: String, value: String },

    /// A unique key already exists
    #[error("Duplicate field value: \"{value}\". Please use another value!")]
    Duplicate { field: String, value: String },

    #[error("{message}")]
    BusinessRule { message: String },

    #[error("No {resource} found with that ID")]
    NotFound { resource: String },

    /// Outbound integration (email, payment) failed
    #[error("{message}")]
    ExternalService { service: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            messages: vec![message.into()],
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    pub fn business(message: impl Into<String>) -> Self {
        DomainError::BusinessRule {
            message: message.into(),
        }
    }

    /// True for anticipated, client-facing failures
    pub fn is_operational(&self) -> bool {
        !matches!(self, DomainError::Internal { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Collects field rule violations before turning them into one error
#[derive(Debug, Default)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` when `failed` is true
    pub fn check(&mut self, failed: bool, message: impl Into<String>) {
        if failed {
            self.messages.push(message.into());
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_result(self) -> DomainResult<()> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation {
                messages: self.messages,
            })
        }
    }
}
