//! Security headers for every response.
//!
//! Sets the usual hardening headers (content sniffing, framing, referrer,
//! cross-origin isolation) and a content security policy that admits the
//! map tiles and checkout scripts used by the pages. HSTS is only sent in
//! production.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, HeaderName, HeaderValue},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use tours_shared::Environment;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self' https:; \
    base-uri 'self'; \
    font-src 'self' https: data:; \
    img-src 'self' data: blob: https:; \
    object-src 'none'; \
    script-src 'self' https://api.mapbox.com https://js.stripe.com; \
    style-src 'self' https: 'unsafe-inline'; \
    worker-src 'self' blob:; \
    frame-src https://js.stripe.com; \
    connect-src 'self' https://api.mapbox.com https://events.mapbox.com; \
    frame-ancestors 'self'; \
    upgrade-insecure-requests";

/// Security headers middleware factory
#[derive(Debug, Clone, Copy)]
pub struct SecurityHeaders {
    /// Whether to send Strict-Transport-Security
    hsts: bool,
}

impl SecurityHeaders {
    pub fn new(environment: Environment) -> Self {
        Self {
            hsts: environment.is_production(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersService {
            service: Rc::new(service),
            hsts: self.hsts,
        }))
    }
}

pub struct SecurityHeadersService<S> {
    service: Rc<S>,
    hsts: bool,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let hsts = self.hsts;

        Box::pin(async move {
            let mut response = service.call(req).await?;
            apply_security_headers(response.headers_mut(), hsts);
            Ok(response)
        })
    }
}

/// Adds the security headers, leaving any already set by a handler
pub fn apply_security_headers(headers: &mut HeaderMap, hsts: bool) {
    let mut set = |name: &'static str, value: &'static str| {
        let name = HeaderName::from_static(name);
        if !headers.contains_key(&name) {
            headers.insert(name, HeaderValue::from_static(value));
        }
    };

    set("content-security-policy", CONTENT_SECURITY_POLICY);
    set("cross-origin-opener-policy", "same-origin");
    set("cross-origin-resource-policy", "same-origin");
    set("referrer-policy", "no-referrer");
    set("x-content-type-options", "nosniff");
    set("x-dns-prefetch-control", "off");
    set("x-download-options", "noopen");
    set("x-frame-options", "SAMEORIGIN");
    set("x-permitted-cross-domain-policies", "none");
    set("x-xss-protection", "0");
    if hsts {
        set("strict-transport-security", "max-age=15552000; includeSubDomains");
    }
}
