use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ApiError;
use crate::models::{ActivitySummary, RunningActivity};
use crate::services::StravaIntegrationService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrlQuery {
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExchangeCodeRequest {
    pub code: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub connection_id: Option<String>,
    pub limit: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectRequest {
    pub connection_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StravaConfigResponse {
    pub configured: bool,
    pub redirect_uri: String,
    pub scope: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrlResponse {
    pub status: &'static str,
    pub auth_url: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub status: &'static str,
    pub summary: ActivitySummary,
    pub activities: Vec<RunningActivity>,
}

pub fn strava_routes(strava_service: StravaIntegrationService) -> Router {
    Router::new()
        .route("/config", get(get_config))
        .route("/auth-url", get(get_auth_url))
        .route("/exchange-code", post(exchange_code))
        .route("/status/:connection_id", get(get_status))
        .route("/sync", post(sync_activities))
        .route("/disconnect", post(disconnect))
        .with_state(strava_service)
}

pub async fn get_config(
    State(service): State<StravaIntegrationService>,
) -> Json<StravaConfigResponse> {
    let config = service.config();
    Json(StravaConfigResponse {
        configured: service.is_configured(),
        redirect_uri: config.redirect_uri.clone(),
        scope: config.scope.clone(),
    })
}

/// Start the OAuth flow. The returned state must come back on exchange.
pub async fn get_auth_url(
    State(service): State<StravaIntegrationService>,
    Query(query): Query<AuthUrlQuery>,
) -> Result<Json<AuthUrlResponse>, ApiError> {
    let (auth_url, state) = service.create_authorization(query.redirect_uri).await?;

    Ok(Json(AuthUrlResponse {
        status: "success",
        auth_url,
        state,
    }))
}

pub async fn exchange_code(
    State(service): State<StravaIntegrationService>,
    WithRejection(Json(request), _): WithRejection<Json<ExchangeCodeRequest>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let connection = service
        .exchange_code(request.code.as_deref(), request.state.as_deref())
        .await?;

    Ok(Json(json!({
        "status": "success",
        "connected": true,
        "connectionId": connection.id,
        "athlete": connection.athlete,
        "expiresAt": connection.expires_at,
    })))
}

pub async fn get_status(
    State(service): State<StravaIntegrationService>,
    Path(connection_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let Some(connection) = service.connection_status(&connection_id).await? else {
        return Ok(Json(json!({ "connected": false })));
    };

    Ok(Json(json!({
        "connected": true,
        "connectionId": connection.id,
        "athlete": connection.athlete,
        "expiresAt": connection.expires_at,
        "lastSync": connection.last_sync,
        "lastSummary": connection.last_summary,
    })))
}

pub async fn sync_activities(
    State(service): State<StravaIntegrationService>,
    WithRejection(Json(request), _): WithRejection<Json<SyncRequest>, ApiError>,
) -> Result<Json<SyncResponse>, ApiError> {
    let (summary, activities) = service
        .sync(request.connection_id.as_deref(), request.limit.as_ref())
        .await?;

    Ok(Json(SyncResponse {
        status: "success",
        summary,
        activities,
    }))
}

pub async fn disconnect(
    State(service): State<StravaIntegrationService>,
    WithRejection(Json(request), _): WithRejection<Json<DisconnectRequest>, ApiError>,
) -> Json<Value> {
    service.disconnect(request.connection_id.as_deref()).await;
    Json(json!({ "status": "success", "connected": false }))
}
