use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::state::AppState;

/// GET /health
///
/// Reports 503 when a configured database does not answer.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database = match &state.database {
        Some(pool) => match pool.health_check().await {
            Ok(true) => "up",
            Ok(false) => "down",
            Err(e) => {
                tracing::warn!(error = %e, "database health check failed");
                "down"
            }
        },
        None => "in-memory",
    };

    let body = json!({
        "status": if database == "down" { "unhealthy" } else { "healthy" },
        "service": "natours-api",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.environment().to_string(),
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if database == "down" {
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}
