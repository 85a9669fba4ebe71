//! Payment provider callbacks

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::info;

use crate::handlers::{ApiError, ApiResult};
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// POST /webhook-checkout
///
/// Reads the raw body so the signature can be checked over the exact bytes
/// that were signed. A completed checkout records the booking.
pub async fn checkout_webhook(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("Webhook error: missing signature".to_string()))?;

    if let Some(booking) = state.bookings.complete_checkout(&body, signature).await? {
        info!(booking_id = %booking.id, tour_id = %booking.tour, "checkout completed");
    }
    Ok(HttpResponse::Ok().json(json!({ "received": true })))
}
