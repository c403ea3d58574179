//! Router-level tests driving the dashboard endpoints over an in-memory store.
//!
//! Run with: cargo test --test http_endpoints

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use ceu_dashboard::common::AppState;
use ceu_dashboard::config::Config;
use ceu_dashboard::routes::{self, build_router};
use ceu_dashboard::store::{Activity, MemoryStore};

const BASE: &str = "/smartceu/api/v1/dashboard";

fn test_config() -> Config {
    Config {
        disable_rate_limiting: true,
        ..Config::default()
    }
}

fn app(store: &Arc<MemoryStore>) -> Router {
    build_router(AppState::new(test_config(), store.clone()))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn current_stats_reports_today() {
    let store = Arc::new(MemoryStore::new());
    let now = Utc::now();
    for _ in 0..3 {
        store.add_reading("LORA-ENTRADA-01", now, Activity::Entry);
    }
    store.add_reading("LORA-SAIDA-01", now, Activity::Exit);

    let (status, body) = get(&app(&store), &format!("{BASE}/current-stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_people"], 2);
    assert_eq!(body["entries_today"], 3);
    assert_eq!(body["exits_today"], 1);
    assert_eq!(body["max_capacity"], 300);
    assert_eq!(body["capacity_percentage"], 0.7);
    assert_eq!(body["has_data_today"], true);
    assert!(body["last_reading"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn empty_store_serializes_null_last_reading() {
    let store = Arc::new(MemoryStore::new());

    let (status, body) = get(&app(&store), &format!("{BASE}/current-stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_people"], 0);
    assert_eq!(body["has_data_today"], false);
    assert!(body["last_reading"].is_null());
}

#[tokio::test]
async fn people_flow_has_six_buckets() {
    let store = Arc::new(MemoryStore::new());
    store.add_reading("LORA-ENTRADA-01", Utc::now(), Activity::Entry);

    let (status, body) = get(&app(&store), &format!("{BASE}/people-flow")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["labels"].as_array().unwrap().len(), 6);
    assert_eq!(body["data"].as_array().unwrap().len(), 6);
    assert_eq!(body["total_readings"], 1);
    assert_eq!(body["period"], "24h");
}

#[tokio::test]
async fn areas_occupation_lists_configured_areas() {
    let store = Arc::new(MemoryStore::new());

    let (status, body) = get(&app(&store), &format!("{BASE}/areas-occupation")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_areas"], 5);
    let first = &body["areas"][0];
    assert_eq!(first["name"], "Entrada Principal");
    assert_eq!(first["capacity"], 100);
    assert_eq!(first["percentage"], 0.0);
    assert_eq!(first["status"], "normal");
}

#[tokio::test]
async fn pool_endpoints_report_unavailable_sources() {
    let store = Arc::new(MemoryStore::new());
    let app = app(&store);

    let (status, body) = get(&app, &format!("{BASE}/pool/current")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["capacity"], 60);
    assert_eq!(body["status"], "no_data");
    assert_eq!(body["has_data"], false);
    assert_eq!(body["occupancy"]["state"], "unavailable");
    assert_eq!(body["water_temperature"]["state"], "unavailable");

    let (status, body) = get(&app, &format!("{BASE}/pool/quality")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overall_status"], "no_data");
    assert_eq!(body["ph"]["status"], "no_data");
    assert_eq!(body["ph"]["min_safe"], 7.2);
    assert_eq!(body["alkalinity"]["max_safe"], 120.0);
}

#[tokio::test]
async fn active_alerts_use_type_key() {
    let store = Arc::new(MemoryStore::new());
    store.add_alert("sensor_offline", "high", "Sensor sem resposta", Utc::now(), "open", None);
    store.add_alert("capacity", "low", "Resolvido", Utc::now(), "resolved", None);

    let (status, body) = get(&app(&store), &format!("{BASE}/alerts/active")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    let alert = &body["alerts"][0];
    assert_eq!(alert["type"], "sensor_offline");
    assert_eq!(alert["severity"], "high");
    assert_eq!(alert["area"], "Sistema");
    assert!(alert["sensor_id"].is_null());
}

#[tokio::test]
async fn store_fault_returns_error_envelope() {
    let store = Arc::new(MemoryStore::new());
    store.fail_with("connection refused");
    let app = app(&store);

    for (path, operation) in [
        ("current-stats", "current statistics"),
        ("people-flow", "people flow"),
        ("areas-occupation", "area occupancy"),
        ("alerts/active", "active alerts"),
    ] {
        let (status, body) = get(&app, &format!("{BASE}/{path}")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        assert_eq!(body["error"], format!("Failed to fetch {operation}"));
        assert!(body["details"].as_str().unwrap().contains("connection refused"));
        assert!(body.get("current_people").is_none());
    }
}

#[tokio::test]
async fn configured_pool_fault_returns_error_envelope() {
    let store = Arc::new(MemoryStore::new());
    let mut config = test_config();
    config.facility.pool.sensors = vec!["POOL-GATE-01".to_string()];
    config.facility.pool.readings_enabled = true;
    let app = build_router(AppState::new(config, store.clone()));
    store.fail_with("connection refused");

    for (path, operation) in [("pool/current", "pool status"), ("pool/quality", "water quality")] {
        let (status, body) = get(&app, &format!("{BASE}/{path}")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        assert_eq!(body["error"], format!("Failed to fetch {operation}"));
        assert!(body["details"].as_str().unwrap().contains("connection refused"));
        assert!(body.get("has_data").is_none());
    }
}

#[tokio::test]
async fn health_reports_store_state() {
    let store = Arc::new(MemoryStore::new());
    store.add_reading("LORA-ENTRADA-01", Utc::now(), Activity::Entry);
    let app = app(&store);

    let (status, body) = get(&app, &format!("{BASE}/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["module"], "dashboard");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["sensors"], 1);
    assert_eq!(body["readings"], 1);

    store.fail_with("timeout");
    let (status, body) = get(&app, &format!("{BASE}/health")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["module"], "dashboard");
    assert!(body["error"].as_str().unwrap().contains("timeout"));
}

#[tokio::test]
async fn healthz_does_not_touch_the_store() {
    let store = Arc::new(MemoryStore::new());
    store.fail_with("down");

    let response = app(&store)
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn routes_live_under_the_base_path_only() {
    let store = Arc::new(MemoryStore::new());
    let app = app(&store);

    let (status, _) = get(&app, "/current-stats").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let root = build_router(AppState::new(
        Config {
            api_base_path: String::new(),
            ..test_config()
        },
        store.clone(),
    ));
    let (status, _) = get(&root, "/current-stats").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn burst_beyond_limit_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let app = build_router(AppState::new(
        Config {
            disable_rate_limiting: false,
            rate_limit_per_second: 60,
            rate_limit_burst: 2,
            ..Config::default()
        },
        store.clone(),
    ));

    for _ in 0..2 {
        let (status, _) = get(&app, &format!("{BASE}/alerts/active")).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = get(&app, &format!("{BASE}/alerts/active")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // Liveness is never limited
    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn openapi_document_points_at_the_base_path() {
    let doc = routes::openapi(BASE);

    let servers = doc.servers.unwrap();
    assert_eq!(servers[0].url, BASE);
    for path in [
        "/current-stats",
        "/people-flow",
        "/areas-occupation",
        "/pool/current",
        "/pool/quality",
        "/alerts/active",
        "/health",
    ] {
        assert!(doc.paths.paths.contains_key(path), "{path}");
    }
}
