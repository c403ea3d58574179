use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

use crate::aggregator::HealthReport;
use crate::common::AppState;

/// Liveness check. Does not touch the store and is not rate-limited.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Store reachability check
///
/// Counts sensors and readings. Reports `unhealthy` with a 500 if the store
/// does not answer.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Store reachable", body = HealthReport),
        (status = 500, description = "Store unreachable"),
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> Response {
    match state.aggregator.health_probe().await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            tracing::error!("Health probe failed: {e:?}");
            let body = Json(json!({
                "status": "unhealthy",
                "module": "dashboard",
                "error": e.to_string(),
                "timestamp": Utc::now(),
            }));
            (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
        }
    }
}
