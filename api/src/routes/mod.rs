//! Route handlers
//!
//! JSON resources live under `/api/v1`; [`pages`] renders the browser views
//! and [`webhook`] receives payment events.

pub mod bookings;
pub mod health;
pub mod pages;
pub mod reviews;
pub mod tours;
pub mod users;
pub mod webhook;

use actix_web::{web, HttpRequest};
use uuid::Uuid;

use tours_core::errors::DomainError;
use tours_core::query::QueryParams;

use crate::handlers::ApiResult;

/// Registers every `/api/v1` resource
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/tours").configure(tours::configure))
        .service(web::scope("/users").configure(users::configure))
        .service(web::scope("/reviews").configure(reviews::configure))
        .service(web::scope("/bookings").configure(bookings::configure));
}

/// Parses a path segment as an entity id
pub(crate) fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        DomainError::Cast {
            field: "_id".to_string(),
            value: raw.to_string(),
        }
        .into()
    })
}

pub(crate) fn query_params(req: &HttpRequest) -> QueryParams {
    QueryParams::parse(req.query_string())
}
