use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use tracing::info;

use tours_shared::ApiResponse;

use crate::dto::{
    validate_request, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest,
    UpdatePasswordRequest,
};
use crate::handlers::ApiResult;
use crate::middleware::{Authenticated, CleanJson};
use crate::state::AppState;

use super::{logged_out_cookie, session_response};

/// POST /api/v1/users/signup
///
/// Creates a `user` account (any `role` in the body is ignored), sends the
/// welcome email and logs the new user in. Responds 201.
pub async fn signup(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: CleanJson<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let welcome_url = format!("{}/me", state.base_url(&req));
    let session = state.auth.signup(body.into_inner().into(), &welcome_url).await?;
    Ok(session_response(&state, &req, session, StatusCode::CREATED))
}

/// POST /api/v1/users/login
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: CleanJson<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let session = state.auth.login(&body.email, &body.password).await?;
    info!(user_id = %session.user.id, "user logged in");
    Ok(session_response(&state, &req, session, StatusCode::OK))
}

/// GET /api/v1/users/logout
///
/// Overwrites the session cookie with a placeholder that expires in 10 seconds.
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(logged_out_cookie())
        .json(serde_json::json!({ "status": "success" }))
}

/// POST /api/v1/users/forgotPassword
///
/// Emails a reset link valid for 10 minutes.
pub async fn forgot_password(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: CleanJson<ForgotPasswordRequest>,
) -> ApiResult<HttpResponse> {
    validate_request(&*body)?;
    let reset_url_prefix = format!("{}/api/v1/users/resetPassword/", state.base_url(&req));
    state.auth.forgot_password(&body.email, &reset_url_prefix).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Token sent to email!")))
}

/// PATCH /api/v1/users/resetPassword/{token}
pub async fn reset_password(
    req: HttpRequest,
    state: web::Data<AppState>,
    token: web::Path<String>,
    body: CleanJson<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let session = state
        .auth
        .reset_password(&token, &body.password, &body.password_confirm)
        .await?;
    Ok(session_response(&state, &req, session, StatusCode::OK))
}

/// PATCH /api/v1/users/updateMyPassword
pub async fn update_password(
    req: HttpRequest,
    state: web::Data<AppState>,
    Authenticated(user): Authenticated,
    body: CleanJson<UpdatePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let session = state
        .auth
        .update_password(
            user.id,
            &body.password_current,
            &body.password,
            &body.password_confirm,
        )
        .await?;
    Ok(session_response(&state, &req, session, StatusCode::OK))
}
