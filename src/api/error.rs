use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::{ImportError, PlanError, StravaError};

/// Errors surfaced to API clients as `{status: "error", message}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "status": "error",
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::Validation(_) => ApiError::BadRequest(err.to_string()),
            PlanError::NoScheduleForLevel(_) => ApiError::NotFound(err.to_string()),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StravaError> for ApiError {
    fn from(err: StravaError) -> Self {
        match err {
            StravaError::NotConfigured => ApiError::ServiceUnavailable(err.to_string()),
            StravaError::MissingOAuthFields | StravaError::InvalidState => {
                ApiError::BadRequest(err.to_string())
            }
            StravaError::ConnectionNotFound => ApiError::NotFound(err.to_string()),
            StravaError::Upstream { status, message } => ApiError::Upstream {
                status: StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            },
            StravaError::Request(e) => {
                tracing::error!("Strava request error: {}", e);
                ApiError::Upstream {
                    status: StatusCode::BAD_GATEWAY,
                    message: "Failed to reach Strava.".to_string(),
                }
            }
        }
    }
}
