use actix_web::{web, HttpResponse};

use tours_core::domain::entities::Entity;
use tours_shared::ApiResponse;

use crate::dto::UpdateMeRequest;
use crate::handlers::ApiResult;
use crate::middleware::{Authenticated, CleanJson};
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn get_me(
    state: web::Data<AppState>,
    Authenticated(user): Authenticated,
) -> ApiResult<HttpResponse> {
    let me = state.users.crud().get_one(user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::document(me.to_document())))
}

/// PATCH /api/v1/users/updateMe; name and email only
pub async fn update_me(
    state: web::Data<AppState>,
    Authenticated(user): Authenticated,
    body: CleanJson<UpdateMeRequest>,
) -> ApiResult<HttpResponse> {
    let updated = state.users.update_me(user.id, body.into_inner().into()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "user": updated }))))
}

/// DELETE /api/v1/users/deleteMe
pub async fn delete_me(
    state: web::Data<AppState>,
    Authenticated(user): Authenticated,
) -> ApiResult<HttpResponse> {
    state.users.delete_me(user.id).await?;
    Ok(HttpResponse::NoContent().finish())
}
