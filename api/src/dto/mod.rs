//! Request bodies and their validation

pub mod auth;

pub use auth::*;

use tours_core::errors::DomainError;
use validator::{Validate, ValidationErrors};

use crate::handlers::ApiError;

/// Runs the derived rules and reports every failing field message
pub fn validate_request<T: Validate>(request: &T) -> Result<(), ApiError> {
    request.validate().map_err(|errors| {
        ApiError::Domain(DomainError::Validation {
            messages: validation_messages(&errors),
        })
    })
}

fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field))
            })
        })
        .collect();
    messages.sort();
    messages
}
