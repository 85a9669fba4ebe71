//! Environment-aware rendering of [`ApiError`] responses
//!
//! Handlers and inner middleware produce the production JSON body. This
//! middleware replaces it with the development body (message, debug
//! rendering and source chain) and with an HTML error page on browser
//! routes. Headers set by inner layers are carried over.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use tours_shared::Environment;

use crate::handlers::ApiError;

/// Paths answered with JSON; everything else is a page
const JSON_PREFIXES: [&str; 3] = ["/api", "/webhook-checkout", "/health"];

pub fn is_page_path(path: &str) -> bool {
    !JSON_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

#[derive(Debug, Clone, Copy)]
pub struct ErrorRendering {
    environment: Environment,
}

impl ErrorRendering {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorRendering
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorRenderingMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorRenderingMiddleware {
            service: Rc::new(service),
            environment: self.environment,
        }))
    }
}

pub struct ErrorRenderingMiddleware<S> {
    service: Rc<S>,
    environment: Environment,
}

impl<S, B> Service<ServiceRequest> for ErrorRenderingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let environment = self.environment;
        let http_request = req.request().clone();
        let page = is_page_path(req.path());

        Box::pin(async move {
            let response = match service.call(req).await {
                Ok(response) => response,
                Err(error) => {
                    let rendered = match error.as_error::<ApiError>() {
                        Some(api_error) => render(api_error, environment, page),
                        None => error.error_response(),
                    };
                    return Ok(ServiceResponse::new(http_request, rendered).map_into_right_body());
                }
            };

            if !page && environment.is_production() {
                return Ok(response.map_into_left_body());
            }

            let rendered = response
                .response()
                .error()
                .and_then(|error| error.as_error::<ApiError>())
                .map(|api_error| render(api_error, environment, page));

            match rendered {
                Some(mut rendered) => {
                    for (name, value) in response.headers() {
                        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
                            rendered.headers_mut().append(name.clone(), value.clone());
                        }
                    }
                    let (request, _) = response.into_parts();
                    Ok(ServiceResponse::new(request, rendered).map_into_right_body())
                }
                None => Ok(response.map_into_left_body()),
            }
        })
    }
}

fn render(error: &ApiError, environment: Environment, page: bool) -> HttpResponse {
    if page {
        error.page_response(environment)
    } else {
        error.json_response(environment)
    }
}
