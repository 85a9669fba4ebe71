//! Rate limiting middleware for the API
//!
//! Counts requests per client IP in a fixed window and answers 429 once the
//! limit is used up. Every counted response carries `X-RateLimit-Limit`,
//! `X-RateLimit-Remaining` and `X-RateLimit-Reset`.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, HeaderName, HeaderValue},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::warn;

use tours_core::services::{RateLimitDecision, RateLimiterTrait};

use crate::handlers::ApiError;

/// Rate limiter middleware factory
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<dyn RateLimiterTrait>,
    enabled: bool,
}

impl RateLimit {
    pub fn new(limiter: Arc<dyn RateLimiterTrait>, enabled: bool) -> Self {
        Self { limiter, enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: Arc::clone(&self.limiter),
            enabled: self.enabled,
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiterTrait>,
    enabled: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limiter = Arc::clone(&self.limiter);
        let enabled = self.enabled;

        Box::pin(async move {
            if !enabled {
                return Ok(service.call(req).await?.map_into_left_body());
            }

            let key = client_key(&req);
            let decision = match limiter.check(&key).await {
                Ok(decision) => decision,
                Err(e) => {
                    // Counter store unavailable: let the request through
                    warn!(error = %e, "rate limiter unavailable");
                    return Ok(service.call(req).await?.map_into_left_body());
                }
            };

            if !decision.allowed {
                warn!(client = %key, path = %req.path(), "rate limit exceeded");
                let mut response = req.error_response(ApiError::RateLimited);
                apply_rate_limit_headers(response.headers_mut(), &decision);
                return Ok(response.map_into_right_body());
            }

            let mut response = service.call(req).await?;
            apply_rate_limit_headers(response.headers_mut(), &decision);
            Ok(response.map_into_left_body())
        })
    }
}

/// Client address as reported by the connection (or a trusted forwarder)
fn client_key(req: &ServiceRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|addr| {
            addr.parse::<std::net::SocketAddr>()
                .map(|socket| socket.ip().to_string())
                .unwrap_or_else(|_| addr.to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn apply_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    let values = [
        ("x-ratelimit-limit", decision.limit.to_string()),
        ("x-ratelimit-remaining", decision.remaining.to_string()),
        ("x-ratelimit-reset", decision.reset_after_seconds.to_string()),
    ];
    for (name, value) in values {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(HeaderName::from_static(name), value);
        }
    }
    if !decision.allowed {
        if let Ok(value) = HeaderValue::from_str(&decision.reset_after_seconds.to_string()) {
            headers.insert(HeaderName::from_static("retry-after"), value);
        }
    }
}
