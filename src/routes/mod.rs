pub mod dashboard;
pub mod health;
mod rate_limit;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::openapi::server::Server;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use rate_limit::ClientIpKeyExtractor;

use crate::aggregator::{self, pool};
use crate::common::AppState;
use crate::error::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    paths(
        dashboard::current_stats,
        dashboard::people_flow,
        dashboard::areas_occupation,
        dashboard::pool_current,
        dashboard::pool_quality,
        dashboard::active_alerts,
        health::health,
    ),
    components(
        schemas(
            aggregator::CurrentStats,
            aggregator::PeopleFlow,
            aggregator::AreasOccupancy,
            aggregator::AreaOccupancy,
            aggregator::calc::Tier,
            aggregator::ActiveAlerts,
            aggregator::ActiveAlert,
            aggregator::HealthReport,
            pool::PoolStatus,
            pool::PoolOccupancy,
            pool::PoolCondition,
            pool::PoolQuality,
            pool::WaterParameter,
            pool::ParameterStatus,
            pool::Measurement,
            ErrorBody,
        )
    ),
    tags(
        (name = "occupancy", description = "Center and area occupancy"),
        (name = "pool", description = "Pool occupancy and water quality"),
        (name = "alerts", description = "Active alerts"),
        (name = "health", description = "Health checks"),
    ),
    info(
        title = "SmartCEU Dashboard API",
        description = "Occupancy and sensor dashboard API for the CEU recreation center",
        version = "0.1.0"
    )
)]
struct ApiDoc;

/// OpenAPI document with the dashboard prefix as its server URL.
pub fn openapi(base_path: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let url = if base_path.is_empty() { "/" } else { base_path };
    doc.servers = Some(vec![Server::new(url)]);
    doc
}

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    let dashboard_routes_base = Router::new()
        .route("/current-stats", get(dashboard::current_stats))
        .route("/people-flow", get(dashboard::people_flow))
        .route("/areas-occupation", get(dashboard::areas_occupation))
        .route("/pool/current", get(dashboard::pool_current))
        .route("/pool/quality", get(dashboard::pool_quality))
        .route("/alerts/active", get(dashboard::active_alerts))
        .route("/health", get(health::health));

    let dashboard_routes = if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
        dashboard_routes_base
    } else {
        let limiter = GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor)
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish();

        match limiter {
            Some(limiter) => {
                tracing::info!(
                    rate = %format!(
                        "1 per {}s, burst {}",
                        config.rate_limit_per_second, config.rate_limit_burst
                    ),
                    "Rate limiting configured"
                );
                dashboard_routes_base.layer(GovernorLayer {
                    config: Arc::new(limiter),
                })
            }
            None => {
                tracing::warn!(
                    replenish_period_secs = config.rate_limit_per_second,
                    burst = config.rate_limit_burst,
                    "Rate limit quota must be non-zero; rate limiting DISABLED"
                );
                dashboard_routes_base
            }
        }
    }
    .layer(RequestBodyLimitLayer::new(64 * 1024)); // GET-only API

    let api_routes = if config.api_base_path.is_empty() {
        dashboard_routes
    } else {
        Router::new().nest(&config.api_base_path, dashboard_routes)
    };

    // Liveness route (NO rate limiting, no store access)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes =
        Router::new().merge(Scalar::with_url("/docs", openapi(&config.api_base_path)));

    Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
