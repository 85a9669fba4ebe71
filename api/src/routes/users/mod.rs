//! `/api/v1/users`: authentication, the caller's own account, admin CRUD

pub mod account;
pub mod admin;
pub mod auth;

use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    http::StatusCode,
    web, HttpRequest, HttpResponse,
};
use serde_json::json;

use tours_core::domain::AuthSession;
use tours_shared::ApiResponse;

use crate::middleware::auth::{JWT_COOKIE, LOGGED_OUT};
use crate::middleware::Protect;
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup", web::post().to(auth::signup))
        .route("/login", web::post().to(auth::login))
        .route("/logout", web::get().to(auth::logout))
        .route("/forgotPassword", web::post().to(auth::forgot_password))
        .route("/resetPassword/{token}", web::patch().to(auth::reset_password))
        .route(
            "/updateMyPassword",
            web::patch().to(auth::update_password).wrap(Protect::any()),
        )
        .route("/me", web::get().to(account::get_me).wrap(Protect::any()))
        .route("/updateMe", web::patch().to(account::update_me).wrap(Protect::any()))
        .route("/deleteMe", web::delete().to(account::delete_me).wrap(Protect::any()))
        .service(
            web::resource("")
                .route(web::get().to(admin::get_all_users))
                .route(web::post().to(admin::create_user)),
        )
        .service(
            web::resource("/{id}")
                .route(web::get().to(admin::get_user))
                .route(web::patch().to(admin::update_user))
                .route(web::delete().to(admin::delete_user)),
        );
}

/// The `jwt` cookie carrying `token`
pub(crate) fn session_cookie(state: &AppState, req: &HttpRequest, token: &str) -> Cookie<'static> {
    Cookie::build(JWT_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.environment().is_production() && state.is_secure(req))
        .max_age(Duration::days(state.config.jwt.cookie_expires_in_days))
        .finish()
}

/// Short-lived cookie that replaces the session on logout
pub(crate) fn logged_out_cookie() -> Cookie<'static> {
    Cookie::build(JWT_COOKIE, LOGGED_OUT)
        .path("/")
        .http_only(true)
        .max_age(Duration::seconds(10))
        .finish()
}

/// `{"status":"success","token":...,"data":{"user":...}}` plus the cookie
pub(crate) fn session_response(
    state: &AppState,
    req: &HttpRequest,
    session: AuthSession,
    status: StatusCode,
) -> HttpResponse {
    let cookie = session_cookie(state, req, &session.token);
    let body = ApiResponse::success(json!({ "user": session.user })).with_token(session.token);
    HttpResponse::build(status).cookie(cookie).json(body)
}
