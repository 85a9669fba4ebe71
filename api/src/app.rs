//! Application factory
//!
//! Builds the Actix-web application from a prepared [`AppState`]. Used by
//! the server binary and by the integration tests.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App,
};
use tracing_actix_web::TracingLogger;

use crate::handlers::{form_config, json_config, not_found};
use crate::middleware::{
    create_cors, ErrorRendering, RateLimit, RequestContextMiddleware, SecurityHeaders,
};
use crate::routes::{self, health::health_check, webhook::checkout_webhook};
use crate::state::AppState;

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let environment = state.environment();
    let config = &state.config;
    let cors = create_cors(&config.cors);
    let rate_limit = RateLimit::new(state.rate_limiter.clone(), config.rate_limit.enabled);
    let json_limit = config.server.json_limit;

    App::new()
        .app_data(state.clone())
        .app_data(json_config(json_limit))
        .app_data(form_config(json_limit))
        // Outermost last: request context, error rendering, security headers, CORS, logging
        .wrap(TracingLogger::default())
        .wrap(cors)
        .wrap(SecurityHeaders::new(environment))
        .wrap(ErrorRendering::new(environment))
        .wrap(RequestContextMiddleware)
        .route("/health", web::get().to(health_check))
        // Signed raw body; outside the rate-limited API scope
        .route("/webhook-checkout", web::post().to(checkout_webhook))
        .service(
            web::scope("/api")
                .wrap(rate_limit)
                .service(web::scope("/v1").configure(routes::configure_api)),
        )
        .configure(routes::pages::configure)
        .default_service(web::to(not_found))
}
