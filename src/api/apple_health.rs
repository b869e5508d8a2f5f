use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ApiError;
use crate::models::{AppleHealthConnection, HealthWorkout, WorkoutSummary};
use crate::services::apple_health_service::RECENT_WORKOUT_LIMIT;
use crate::services::AppleHealthService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub connection_id: Option<String>,
    pub workouts: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectRequest {
    pub connection_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleHealthStatusResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    pub connected: bool,
    pub connection_id: String,
    pub last_sync: chrono::DateTime<chrono::Utc>,
    pub summary: WorkoutSummary,
    pub recent_workouts: Vec<HealthWorkout>,
}

impl AppleHealthStatusResponse {
    fn from_connection(connection: AppleHealthConnection, status: Option<&'static str>) -> Self {
        let mut recent_workouts = connection.workouts;
        recent_workouts.truncate(RECENT_WORKOUT_LIMIT);

        Self {
            status,
            connected: true,
            connection_id: connection.id,
            last_sync: connection.last_sync,
            summary: connection.summary,
            recent_workouts,
        }
    }
}

pub fn apple_health_routes(apple_health_service: AppleHealthService) -> Router {
    Router::new()
        .route("/import", post(import_workouts))
        .route("/status/:connection_id", get(get_status))
        .route("/disconnect", post(disconnect))
        .with_state(apple_health_service)
}

/// Store workouts the client already extracted from an Apple Health export
pub async fn import_workouts(
    State(service): State<AppleHealthService>,
    WithRejection(Json(request), _): WithRejection<Json<ImportRequest>, ApiError>,
) -> Result<Json<AppleHealthStatusResponse>, ApiError> {
    let connection = service
        .import(request.connection_id.as_deref(), request.workouts.as_ref())
        .await?;

    Ok(Json(AppleHealthStatusResponse::from_connection(
        connection,
        Some("success"),
    )))
}

pub async fn get_status(
    State(service): State<AppleHealthService>,
    Path(connection_id): Path<String>,
) -> Json<Value> {
    match service.status(&connection_id).await {
        Some(connection) => {
            Json(json!(AppleHealthStatusResponse::from_connection(connection, None)))
        }
        None => Json(json!({ "connected": false })),
    }
}

pub async fn disconnect(
    State(service): State<AppleHealthService>,
    WithRejection(Json(request), _): WithRejection<Json<DisconnectRequest>, ApiError>,
) -> Json<Value> {
    service.disconnect(request.connection_id.as_deref()).await;
    Json(json!({ "status": "success", "connected": false }))
}
