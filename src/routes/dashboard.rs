use axum::{extract::State, Json};

use crate::aggregator::{
    pool::{PoolQuality, PoolStatus},
    ActiveAlerts, AreasOccupancy, CurrentStats, PeopleFlow,
};
use crate::common::AppState;
use crate::error::{AppError, AppResult, ErrorBody};

/// Current occupancy of the whole center
///
/// Entries minus exits since local midnight, compared against the center's
/// maximum capacity.
#[utoipa::path(
    get,
    path = "/current-stats",
    responses(
        (status = 200, description = "Daily occupancy snapshot", body = CurrentStats),
        (status = 500, description = "Store fault", body = ErrorBody),
    ),
    tag = "occupancy"
)]
pub async fn current_stats(State(state): State<AppState>) -> AppResult<Json<CurrentStats>> {
    let stats = state
        .aggregator
        .current_snapshot()
        .await
        .map_err(|e| AppError::aggregation("current statistics", e))?;

    Ok(Json(stats))
}

/// People flow over the last 24 hours
///
/// Six 4-hour buckets. Each value is half the raw readings in the bucket.
#[utoipa::path(
    get,
    path = "/people-flow",
    responses(
        (status = 200, description = "Bucketed flow histogram", body = PeopleFlow),
        (status = 500, description = "Store fault", body = ErrorBody),
    ),
    tag = "occupancy"
)]
pub async fn people_flow(State(state): State<AppState>) -> AppResult<Json<PeopleFlow>> {
    let flow = state
        .aggregator
        .flow_last_24h()
        .await
        .map_err(|e| AppError::aggregation("people flow", e))?;

    Ok(Json(flow))
}

/// Occupancy per monitored area
#[utoipa::path(
    get,
    path = "/areas-occupation",
    responses(
        (status = 200, description = "Per-area occupancy with status tier", body = AreasOccupancy),
        (status = 500, description = "Store fault", body = ErrorBody),
    ),
    tag = "occupancy"
)]
pub async fn areas_occupation(State(state): State<AppState>) -> AppResult<Json<AreasOccupancy>> {
    let areas = state
        .aggregator
        .area_occupancy()
        .await
        .map_err(|e| AppError::aggregation("area occupancy", e))?;

    Ok(Json(areas))
}

/// Pool occupancy and temperatures
#[utoipa::path(
    get,
    path = "/pool/current",
    responses(
        (status = 200, description = "Pool status", body = PoolStatus),
        (status = 500, description = "Store fault", body = ErrorBody),
    ),
    tag = "pool"
)]
pub async fn pool_current(State(state): State<AppState>) -> AppResult<Json<PoolStatus>> {
    let status = state
        .aggregator
        .pool_status()
        .await
        .map_err(|e| AppError::aggregation("pool status", e))?;

    Ok(Json(status))
}

/// Pool water quality
#[utoipa::path(
    get,
    path = "/pool/quality",
    responses(
        (status = 200, description = "Water quality with safe ranges", body = PoolQuality),
        (status = 500, description = "Store fault", body = ErrorBody),
    ),
    tag = "pool"
)]
pub async fn pool_quality(State(state): State<AppState>) -> AppResult<Json<PoolQuality>> {
    let quality = state
        .aggregator
        .pool_quality()
        .await
        .map_err(|e| AppError::aggregation("water quality", e))?;

    Ok(Json(quality))
}

/// Most recent open or acknowledged alerts
#[utoipa::path(
    get,
    path = "/alerts/active",
    responses(
        (status = 200, description = "Active alerts, newest first", body = ActiveAlerts),
        (status = 500, description = "Store fault", body = ErrorBody),
    ),
    tag = "alerts"
)]
pub async fn active_alerts(State(state): State<AppState>) -> AppResult<Json<ActiveAlerts>> {
    let alerts = state
        .aggregator
        .active_alerts()
        .await
        .map_err(|e| AppError::aggregation("active alerts", e))?;

    Ok(Json(alerts))
}
