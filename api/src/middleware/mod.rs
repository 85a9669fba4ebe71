//! Middleware and request extractors

pub mod auth;
pub mod cors;
pub mod error_rendering;
pub mod rate_limit;
pub mod request_context;
pub mod sanitize;
pub mod security;

pub use auth::{
    extract_token, AdminOnly, Authenticated, MaybeUser, Protect, Restricted, ReviewEditors,
    Reviewers, RoleSet, TourManagers, JWT_COOKIE,
};
pub use cors::create_cors;
pub use error_rendering::ErrorRendering;
pub use rate_limit::RateLimit;
pub use request_context::{RequestContext, RequestContextMiddleware};
pub use sanitize::CleanJson;
pub use security::SecurityHeaders;
