#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

use training_fox::api::routes::create_routes;
use training_fox::config::{AppConfig, StravaConfig};
use training_fox::services::{Clock, FixedClock, ScheduleStore};

/// Monday 2026-10-19, 09:00 UTC.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
}

pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::new(test_now()))
}

pub fn bundled_store() -> Arc<ScheduleStore> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/training_schedules.csv");
    Arc::new(ScheduleStore::from_path(path).expect("bundled schedules should load"))
}

pub fn test_config(strava: StravaConfig) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        schedules_path: PathBuf::from("data/training_schedules.csv"),
        strava,
    }
}

pub fn unconfigured_strava() -> StravaConfig {
    StravaConfig::new("", "", "http://localhost:3000/devices")
}

pub fn create_test_app(store: Arc<ScheduleStore>, strava: StravaConfig) -> Router {
    create_routes(&test_config(strava), store, fixed_clock()).expect("router should build")
}

pub fn default_app() -> Router {
    create_test_app(bundled_store(), unconfigured_strava())
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}
