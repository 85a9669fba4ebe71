//! CORS configuration for cross-origin requests.
//!
//! Development allows any origin; production only the origins listed in
//! `CORS_ALLOWED_ORIGINS`. Credentials are allowed so the `jwt` cookie can
//! travel with API calls from the pages.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use tours_shared::CorsConfig;

pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-request-id"),
            header::HeaderName::from_static("x-ratelimit-limit"),
            header::HeaderName::from_static("x-ratelimit-remaining"),
            header::HeaderName::from_static("x-ratelimit-reset"),
        ])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::debug!("CORS allows any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }
    cors
}
