//! `/api/v1/tours`, including the nested review routes

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::Value;

use tours_core::domain::entities::{Entity, NewReview, NewTour, TourPatch};
use tours_core::query::QueryParams;
use tours_shared::ApiResponse;

use crate::handlers::ApiResult;
use crate::middleware::{Authenticated, CleanJson, RequestContext, Restricted, Reviewers, TourManagers};
use crate::state::AppState;

use super::{parse_id, query_params};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(get_all_tours))
            .route(web::post().to(create_tour)),
    )
    .service(web::resource("/top-5-cheap").route(web::get().to(top_five_cheap)))
    .service(
        web::resource("/{tour_id}/reviews")
            .route(web::get().to(get_tour_reviews))
            .route(web::post().to(create_tour_review)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_tour))
            .route(web::patch().to(update_tour))
            .route(web::delete().to(delete_tour)),
    );
}

/// Preset query for the five best-rated cheap tours
pub fn alias_top_tours(params: &mut QueryParams) {
    params.set("limit", "5");
    params.set("sort", "-ratingsAverage,price");
    params.set("fields", "name,price,ratingsAverage,summary,difficulty");
}

async fn list_tours(
    state: &AppState,
    params: &QueryParams,
    ctx: RequestContext,
) -> ApiResult<HttpResponse> {
    let tours = state.tours.list(params).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(tours, ctx.requested_at)))
}

/// GET /api/v1/tours
///
/// Supports filtering (`price[lt]=1000`), `sort`, `fields`, `page` and `limit`.
async fn get_all_tours(
    req: HttpRequest,
    state: web::Data<AppState>,
    ctx: RequestContext,
) -> ApiResult<HttpResponse> {
    list_tours(&state, &query_params(&req), ctx).await
}

async fn top_five_cheap(
    req: HttpRequest,
    state: web::Data<AppState>,
    ctx: RequestContext,
) -> ApiResult<HttpResponse> {
    let mut params = query_params(&req);
    alias_top_tours(&mut params);
    list_tours(&state, &params, ctx).await
}

/// GET /api/v1/tours/{id} with guides and reviews populated
async fn get_tour(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let detail = state.tours.detail(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::document(detail.to_document())))
}

async fn create_tour(
    state: web::Data<AppState>,
    _manager: Restricted<TourManagers>,
    body: CleanJson<NewTour>,
) -> ApiResult<HttpResponse> {
    let tour = state.tours.crud().create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::document(tour.to_document())))
}

async fn update_tour(
    state: web::Data<AppState>,
    _manager: Restricted<TourManagers>,
    path: web::Path<String>,
    body: CleanJson<TourPatch>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let tour = state.tours.crud().update_one(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::document(tour.to_document())))
}

async fn delete_tour(
    state: web::Data<AppState>,
    _manager: Restricted<TourManagers>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    state.tours.crud().delete_one(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/tours/{tourId}/reviews
async fn get_tour_reviews(
    req: HttpRequest,
    state: web::Data<AppState>,
    _user: Authenticated,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let tour_id = parse_id(&path)?;
    let reviews: Vec<Value> = state
        .reviews
        .list(&query_params(&req), Some(tour_id))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(reviews, ctx.requested_at)))
}

/// POST /api/v1/tours/{tourId}/reviews; the author is the session user
async fn create_tour_review(
    state: web::Data<AppState>,
    author: Restricted<Reviewers>,
    path: web::Path<String>,
    body: CleanJson<NewReview>,
) -> ApiResult<HttpResponse> {
    let tour_id = parse_id(&path)?;
    let review = state
        .reviews
        .create(&author.user, Some(tour_id), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::document(review.to_document())))
}
