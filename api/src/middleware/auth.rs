//! Session authentication for protected routes.
//!
//! The session token comes from the `Authorization: Bearer` header or, for
//! browser requests, the `jwt` cookie. [`Protect`] guards whole scopes and
//! resources; the [`Authenticated`], [`Restricted`] and [`MaybeUser`]
//! extractors give handlers the user, reusing what the middleware resolved.

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    marker::PhantomData,
    rc::Rc,
    task::{Context, Poll},
};

use tours_core::domain::entities::{Role, User};

use crate::handlers::ApiError;
use crate::state::AppState;

/// Name of the session cookie
pub const JWT_COOKIE: &str = "jwt";

/// Value the cookie is overwritten with on logout
pub const LOGGED_OUT: &str = "loggedout";

/// Session token from the bearer header, falling back to the cookie
pub fn extract_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    bearer.or_else(|| {
        req.cookie(JWT_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty() && value != LOGGED_OUT)
    })
}

pub(crate) fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, ApiError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| ApiError::Internal("application state is not configured".to_string()))
}

/// Resolves the session user once per request
async fn authenticate(req: &HttpRequest) -> Result<User, ApiError> {
    if let Some(Authenticated(user)) = req.extensions().get::<Authenticated>().cloned() {
        return Ok(user);
    }

    let state = app_state(req)?;
    let token = extract_token(req);
    let user = state.auth.authorize(token.as_deref()).await?;
    req.extensions_mut().insert(Authenticated(user.clone()));
    Ok(user)
}

/// The logged-in user; rejects anonymous requests with 401
#[derive(Debug, Clone)]
pub struct Authenticated(pub User);

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { Ok(Authenticated(authenticate(&req).await?)) })
    }
}

/// A set of roles allowed through [`Restricted`]
pub trait RoleSet {
    const ROLES: &'static [Role];
}

pub struct AdminOnly;
impl RoleSet for AdminOnly {
    const ROLES: &'static [Role] = &[Role::Admin];
}

pub struct TourManagers;
impl RoleSet for TourManagers {
    const ROLES: &'static [Role] = &[Role::Admin, Role::LeadGuide];
}

pub struct Reviewers;
impl RoleSet for Reviewers {
    const ROLES: &'static [Role] = &[Role::User];
}

pub struct ReviewEditors;
impl RoleSet for ReviewEditors {
    const ROLES: &'static [Role] = &[Role::User, Role::Admin];
}

/// The logged-in user, who must hold one of `R::ROLES` (403 otherwise)
pub struct Restricted<R: RoleSet> {
    pub user: User,
    _roles: PhantomData<R>,
}

impl<R: RoleSet + 'static> FromRequest for Restricted<R> {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = authenticate(&req).await?;
            app_state(&req)?.auth.restrict_to(&user, R::ROLES).map_err(ApiError::from)?;
            Ok(Restricted {
                user,
                _roles: PhantomData,
            })
        })
    }
}

/// The logged-in user if any; never fails. Used by the pages.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            if let Some(Authenticated(user)) = req.extensions().get::<Authenticated>().cloned() {
                return Ok(MaybeUser(Some(user)));
            }
            let Ok(state) = app_state(&req) else {
                return Ok(MaybeUser(None));
            };
            let token = extract_token(&req);
            Ok(MaybeUser(state.auth.current_user(token.as_deref()).await))
        })
    }
}

/// Middleware rejecting requests without a valid session
#[derive(Debug, Clone, Copy, Default)]
pub struct Protect {
    roles: Option<&'static [Role]>,
}

impl Protect {
    /// Any logged-in user
    pub fn any() -> Self {
        Self { roles: None }
    }

    /// Only users holding one of `roles`
    pub fn to(roles: &'static [Role]) -> Self {
        Self { roles: Some(roles) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Protect
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ProtectMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ProtectMiddleware {
            service: Rc::new(service),
            roles: self.roles,
        }))
    }
}

pub struct ProtectMiddleware<S> {
    service: Rc<S>,
    roles: Option<&'static [Role]>,
}

impl<S, B> Service<ServiceRequest> for ProtectMiddleware<S>
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
        let roles = self.roles;

        Box::pin(async move {
            let http_request = req.request().clone();
            let checked = match authenticate(&http_request).await {
                Ok(user) => match roles {
                    Some(roles) if !user.has_role(roles) => {
                        Err(ApiError::from(tours_core::errors::AuthError::InsufficientPermissions))
                    }
                    _ => Ok(()),
                },
                Err(e) => Err(e),
            };

            match checked {
                Ok(()) => Ok(service.call(req).await?.map_into_left_body()),
                Err(e) => Ok(req.error_response(e).map_into_right_body()),
            }
        })
    }
}
