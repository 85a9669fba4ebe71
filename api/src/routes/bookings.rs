//! `/api/v1/bookings`

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use tours_core::domain::entities::{BookingPatch, Entity, NewBooking};
use tours_core::services::CheckoutUrls;
use tours_shared::ApiResponse;

use crate::handlers::ApiResult;
use crate::middleware::{Authenticated, CleanJson, Protect, RequestContext, TourManagers};
use crate::middleware::auth::RoleSet;
use crate::state::AppState;

use super::{parse_id, query_params};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/checkout-session/{tour_id}",
        web::get().to(checkout_session).wrap(Protect::any()),
    )
    .service(
        web::resource("")
            .wrap(Protect::to(TourManagers::ROLES))
            .route(web::get().to(get_all_bookings))
            .route(web::post().to(create_booking)),
    )
    .service(
        web::resource("/{id}")
            .wrap(Protect::to(TourManagers::ROLES))
            .route(web::get().to(get_booking))
            .route(web::patch().to(update_booking))
            .route(web::delete().to(delete_booking)),
    );
}

/// GET /api/v1/bookings/checkout-session/{tourId}
///
/// Opens a hosted payment page for the tour. The booking itself is only
/// recorded once the payment provider calls the webhook.
async fn checkout_session(
    req: HttpRequest,
    state: web::Data<AppState>,
    Authenticated(user): Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let tour_id = parse_id(&path)?;
    let urls = CheckoutUrls::new(state.base_url(&req));
    let session = state.bookings.checkout_session(tour_id, &user, &urls).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "success", "session": session })))
}

async fn get_all_bookings(
    req: HttpRequest,
    state: web::Data<AppState>,
    ctx: RequestContext,
) -> ApiResult<HttpResponse> {
    let bookings = state.bookings.list(&query_params(&req)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(bookings, ctx.requested_at)))
}

async fn create_booking(
    state: web::Data<AppState>,
    body: CleanJson<NewBooking>,
) -> ApiResult<HttpResponse> {
    let booking = state.bookings.crud().create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::document(booking.to_document())))
}

async fn get_booking(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let booking = state.bookings.get(parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::document(booking)))
}

async fn update_booking(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: CleanJson<BookingPatch>,
) -> ApiResult<HttpResponse> {
    let booking = state
        .bookings
        .crud()
        .update_one(parse_id(&path)?, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::document(booking.to_document())))
}

async fn delete_booking(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    state.bookings.crud().delete_one(parse_id(&path)?).await?;
    Ok(HttpResponse::NoContent().finish())
}
