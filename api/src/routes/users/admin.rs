//! Admin-only user management

use actix_web::{web, HttpRequest, HttpResponse};

use tours_core::domain::entities::{Entity, UserPatch};
use tours_shared::ApiResponse;

use crate::handlers::{ApiError, ApiResult};
use crate::middleware::{AdminOnly, CleanJson, RequestContext, Restricted};
use crate::routes::{parse_id, query_params};
use crate::state::AppState;

pub async fn get_all_users(
    req: HttpRequest,
    state: web::Data<AppState>,
    _admin: Restricted<AdminOnly>,
    ctx: RequestContext,
) -> ApiResult<HttpResponse> {
    let listing = state.users.crud().get_all(&query_params(&req), None).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(listing.documents(), ctx.requested_at)))
}

/// Accounts are only created through signup
pub async fn create_user(_admin: Restricted<AdminOnly>) -> ApiResult<HttpResponse> {
    Err(ApiError::BadRequest(
        "This route is not defined! Please use /signup instead".to_string(),
    ))
}

pub async fn get_user(
    state: web::Data<AppState>,
    _admin: Restricted<AdminOnly>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = state.users.crud().get_one(parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::document(user.to_document())))
}

/// Never changes passwords
pub async fn update_user(
    state: web::Data<AppState>,
    _admin: Restricted<AdminOnly>,
    path: web::Path<String>,
    body: CleanJson<UserPatch>,
) -> ApiResult<HttpResponse> {
    let user = state
        .users
        .crud()
        .update_one(parse_id(&path)?, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::document(user.to_document())))
}

pub async fn delete_user(
    state: web::Data<AppState>,
    _admin: Restricted<AdminOnly>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.users.crud().delete_one(parse_id(&path)?).await?;
    Ok(HttpResponse::NoContent().finish())
}
