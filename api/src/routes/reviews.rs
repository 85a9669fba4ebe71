//! `/api/v1/reviews`; every route needs a session

use actix_web::{web, HttpRequest, HttpResponse};

use tours_core::domain::entities::{Entity, NewReview, ReviewPatch};
use tours_shared::ApiResponse;

use crate::handlers::ApiResult;
use crate::middleware::{CleanJson, Protect, RequestContext, Restricted, ReviewEditors, Reviewers};
use crate::state::AppState;

use super::{parse_id, query_params};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .wrap(Protect::any())
            .route(web::get().to(get_all_reviews))
            .route(web::post().to(create_review)),
    )
    .service(
        web::resource("/{id}")
            .wrap(Protect::any())
            .route(web::get().to(get_review))
            .route(web::patch().to(update_review))
            .route(web::delete().to(delete_review)),
    );
}

async fn get_all_reviews(
    req: HttpRequest,
    state: web::Data<AppState>,
    ctx: RequestContext,
) -> ApiResult<HttpResponse> {
    let reviews = state.reviews.list(&query_params(&req), None).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(reviews, ctx.requested_at)))
}

/// The tour comes from the body here; the author is always the caller
async fn create_review(
    state: web::Data<AppState>,
    author: Restricted<Reviewers>,
    body: CleanJson<NewReview>,
) -> ApiResult<HttpResponse> {
    let review = state
        .reviews
        .create(&author.user, None, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::document(review.to_document())))
}

async fn get_review(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let review = state.reviews.get(parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::document(review)))
}

async fn update_review(
    state: web::Data<AppState>,
    _editor: Restricted<ReviewEditors>,
    path: web::Path<String>,
    body: CleanJson<ReviewPatch>,
) -> ApiResult<HttpResponse> {
    let review = state
        .reviews
        .update(parse_id(&path)?, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::document(review.to_document())))
}

async fn delete_review(
    state: web::Data<AppState>,
    _editor: Restricted<ReviewEditors>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.reviews.delete(parse_id(&path)?).await?;
    Ok(HttpResponse::NoContent().finish())
}
