//! Centralized error translation
//!
//! Every failure leaving a handler, extractor or middleware is an
//! [`ApiError`]. Its `ResponseError` impl produces the production JSON
//! body; [`ErrorRendering`](crate::middleware::ErrorRendering) re-renders
//! it with debug detail in development and as an HTML page for page routes.

use std::error::Error as StdError;

use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse, ResponseError,
};
use tracing::error;

use tours_core::errors::{AuthError, DomainError, TokenError};
use tours_shared::errors::{error_codes, ErrorResponse};
use tours_shared::Environment;

use crate::views;

const GENERIC_MESSAGE: &str = "Something went very wrong!";
const GENERIC_PAGE_MESSAGE: &str = "Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Can't find {0} on this server!")]
    RouteNotFound(String),

    #[error("Too many requests from this IP, please try again in an hour!")]
    RateLimited,

    #[error("{0}")]
    BadRequest(String),

    /// A page whose subject does not exist
    #[error("{0}")]
    NotFound(String),

    #[error("Request body is too large")]
    PayloadTooLarge,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        ApiError::Domain(error.into())
    }
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        ApiError::Domain(error.into())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// True for anticipated failures whose message is safe to show in production
    pub fn is_operational(&self) -> bool {
        match self {
            ApiError::Domain(DomainError::Token(TokenError::TokenGenerationFailed)) => false,
            ApiError::Domain(DomainError::ExternalService { .. }) => false,
            ApiError::Domain(error) => error.is_operational(),
            ApiError::Internal(_) => false,
            _ => true,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Domain(error) => match error {
                DomainError::Validation { .. } => error_codes::VALIDATION_ERROR,
                DomainError::Cast { .. } => error_codes::CAST_ERROR,
                DomainError::Duplicate { .. } => error_codes::DUPLICATE_FIELD,
                DomainError::BusinessRule { .. } => error_codes::BAD_REQUEST,
                DomainError::NotFound { .. } => error_codes::NOT_FOUND,
                DomainError::ExternalService { service, .. } if service == "payment" => {
                    error_codes::PAYMENT_ERROR
                }
                DomainError::ExternalService { .. } => error_codes::EMAIL_ERROR,
                DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
                DomainError::Auth(auth) => match auth {
                    AuthError::InsufficientPermissions => error_codes::FORBIDDEN,
                    AuthError::EmailNotFound => error_codes::NOT_FOUND,
                    AuthError::EmailDeliveryFailed => error_codes::EMAIL_ERROR,
                    AuthError::MissingCredentials
                    | AuthError::ResetTokenInvalid
                    | AuthError::PasswordUpdateNotAllowed => error_codes::BAD_REQUEST,
                    _ => error_codes::UNAUTHORIZED,
                },
                DomainError::Token(TokenError::TokenExpired) => error_codes::TOKEN_EXPIRED,
                DomainError::Token(TokenError::InvalidToken) => error_codes::TOKEN_INVALID,
                DomainError::Token(TokenError::TokenGenerationFailed) => {
                    error_codes::INTERNAL_ERROR
                }
            },
            ApiError::RouteNotFound(_) | ApiError::NotFound(_) => error_codes::NOT_FOUND,
            ApiError::RateLimited => error_codes::RATE_LIMIT_EXCEEDED,
            ApiError::BadRequest(_) => error_codes::BAD_REQUEST,
            ApiError::PayloadTooLarge => error_codes::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// Message shown to the client in `environment`
    pub fn client_message(&self, environment: Environment) -> String {
        if self.is_operational() || environment.is_development() {
            self.to_string()
        } else {
            GENERIC_MESSAGE.to_string()
        }
    }

    /// JSON error body for `environment`
    pub fn to_error_response(&self, environment: Environment) -> ErrorResponse {
        let body = ErrorResponse::new(
            self.status_code().as_u16(),
            self.code(),
            self.client_message(environment),
        );
        if environment.is_development() {
            body.with_debug(format!("{:?}", self), source_chain(self))
        } else {
            body
        }
    }

    pub fn json_response(&self, environment: Environment) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_error_response(environment))
    }

    /// Error page for browser routes
    pub fn page_response(&self, environment: Environment) -> HttpResponse {
        let message = if self.is_operational() || environment.is_development() {
            self.to_string()
        } else {
            GENERIC_PAGE_MESSAGE.to_string()
        };
        match views::error_page(&message, None) {
            Ok(page) => HttpResponse::build(self.status_code())
                .content_type(ContentType::html())
                .body(page),
            Err(e) => {
                error!(error = ?e, "error page could not be rendered");
                self.json_response(environment)
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(error) => match error {
                DomainError::Validation { .. }
                | DomainError::Cast { .. }
                | DomainError::Duplicate { .. }
                | DomainError::BusinessRule { .. } => StatusCode::BAD_REQUEST,
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::ExternalService { .. } | DomainError::Internal { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                DomainError::Auth(auth) => match auth {
                    AuthError::MissingCredentials
                    | AuthError::ResetTokenInvalid
                    | AuthError::PasswordUpdateNotAllowed => StatusCode::BAD_REQUEST,
                    AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
                    AuthError::EmailNotFound => StatusCode::NOT_FOUND,
                    AuthError::EmailDeliveryFailed => StatusCode::INTERNAL_SERVER_ERROR,
                    AuthError::InvalidCredentials
                    | AuthError::NotLoggedIn
                    | AuthError::UserNoLongerExists
                    | AuthError::PasswordChangedAfterToken
                    | AuthError::IncorrectCurrentPassword => StatusCode::UNAUTHORIZED,
                },
                DomainError::Token(TokenError::TokenGenerationFailed) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                DomainError::Token(_) => StatusCode::UNAUTHORIZED,
            },
            ApiError::RouteNotFound(_) | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if !self.is_operational() {
            error!(error = ?self, "unhandled error");
        }
        self.json_response(Environment::Production)
    }
}

fn source_chain(error: &dyn StdError) -> String {
    let mut chain = vec![error.to_string()];
    let mut current = error.source();
    while let Some(source) = current {
        chain.push(source.to_string());
        current = source.source();
    }
    chain.join("\n    caused by: ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(error: impl Into<ApiError>) -> u16 {
        error.into().status_code().as_u16()
    }

    #[test]
    fn test_status_table() {
        assert_eq!(
            status(DomainError::Cast {
                field: "id".into(),
                value: "abc".into()
            }),
            400
        );
        assert_eq!(
            status(DomainError::Duplicate {
                field: "name".into(),
                value: "x".into()
            }),
            400
        );
        assert_eq!(status(DomainError::validation("bad")), 400);
        assert_eq!(status(TokenError::InvalidToken), 401);
        assert_eq!(status(TokenError::TokenExpired), 401);
        assert_eq!(status(AuthError::InsufficientPermissions), 403);
        assert_eq!(status(DomainError::not_found("tour")), 404);
        assert_eq!(status(ApiError::RouteNotFound("/x".into())), 404);
        assert_eq!(status(ApiError::RateLimited), 429);
        assert_eq!(status(DomainError::internal("boom")), 500);
    }

    #[test]
    fn test_production_hides_programming_errors() {
        let error = ApiError::from(DomainError::internal("pool exhausted"));
        let body = error.to_error_response(Environment::Production);
        assert_eq!(body.message, "Something went very wrong!");
        assert!(body.stack.is_none());
    }

    #[test]
    fn test_production_keeps_operational_messages() {
        let error = ApiError::from(DomainError::not_found("tour"));
        let body = error.to_error_response(Environment::Production);
        assert_eq!(body.message, "No tour found with that ID");
        assert_eq!(body.code, "NOT_FOUND");
    }

    #[test]
    fn test_development_adds_debug_detail() {
        let error = ApiError::from(DomainError::internal("pool exhausted"));
        let body = error.to_error_response(Environment::Development);
        assert_eq!(body.message, "Internal error: pool exhausted");
        assert!(body.error.unwrap().contains("Internal"));
        assert!(body.stack.is_some());
    }

    #[test]
    fn test_token_messages() {
        assert_eq!(
            ApiError::from(TokenError::InvalidToken).to_string(),
            "Invalid token. Please log in again!"
        );
        assert_eq!(
            ApiError::from(TokenError::TokenExpired).to_string(),
            "Your token has expired! Please log in again."
        );
    }
}
