//! Error translation and the framework-level handlers that produce errors

pub mod error;

pub use error::{ApiError, ApiResult};

use actix_web::{error::JsonPayloadError, web, HttpRequest};

/// JSON extractor configuration: body limit plus error translation
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| json_error(err).into())
}

/// Form extractor configuration for page submissions
pub fn form_config(limit: usize) -> web::FormConfig {
    web::FormConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ApiError::BadRequest(format!("Invalid form data: {}", err)).into())
}

fn json_error(err: JsonPayloadError) -> ApiError {
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            ApiError::PayloadTooLarge
        }
        other => ApiError::BadRequest(format!("Invalid JSON body: {}", other)),
    }
}

/// Default service for unknown routes
pub async fn not_found(req: HttpRequest) -> ApiResult<()> {
    Err(ApiError::RouteNotFound(req.uri().to_string()))
}
