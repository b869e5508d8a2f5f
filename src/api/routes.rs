use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::apple_health::apple_health_routes;
use super::health::health_check;
use super::strava::strava_routes;
use super::training::training_routes;
use crate::config::app::{AppConfig, MAX_BODY_BYTES};
use crate::services::{
    AppleHealthService, Clock, IntegrationStore, ScheduleStore, StravaIntegrationService,
};

pub fn create_routes(
    config: &AppConfig,
    store: Arc<ScheduleStore>,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Router> {
    let integrations = IntegrationStore::new();
    let strava_service =
        StravaIntegrationService::new(config.strava.clone(), integrations.clone(), clock.clone())?;
    let apple_health_service = AppleHealthService::new(integrations, clock.clone());

    let api = Router::new()
        .merge(training_routes(store, clock))
        .nest("/integrations/strava", strava_routes(strava_service))
        .nest(
            "/integrations/apple-health",
            apple_health_routes(apple_health_service),
        );

    Ok(Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http()))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("Request handler panicked: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "message": "Internal server error" })),
    )
        .into_response()
}
