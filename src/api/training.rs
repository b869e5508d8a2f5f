use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::error::ApiError;
use crate::models::{GeneratedPlan, WorkoutTemplate};
use crate::services::{Clock, PlanGenerationService, ScheduleStore};

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub plan: GeneratedPlan,
}

#[derive(Clone)]
pub struct TrainingAppState {
    pub store: Arc<ScheduleStore>,
    pub plan_generation_service: PlanGenerationService,
    pub clock: Arc<dyn Clock>,
}

pub fn training_routes(store: Arc<ScheduleStore>, clock: Arc<dyn Clock>) -> Router {
    let plan_generation_service = PlanGenerationService::new(store.clone());
    let shared_state = TrainingAppState {
        store,
        plan_generation_service,
        clock,
    };

    Router::new()
        .route("/training-schedules", get(get_training_schedules))
        .route("/generate-plan", post(generate_plan))
        .with_state(shared_state)
}

/// Every workout template the server loaded
pub async fn get_training_schedules(
    State(state): State<TrainingAppState>,
) -> Json<Vec<WorkoutTemplate>> {
    Json(state.store.templates().to_vec())
}

/// Generate a 7-day plan starting today
pub async fn generate_plan(
    State(state): State<TrainingAppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
    let body = match body {
        Ok(Json(body)) => body,
        // a body not declared as JSON carries no fields
        Err(JsonRejection::MissingJsonContentType(_)) => Value::Object(Default::default()),
        Err(rejection) => return Err(rejection.into()),
    };

    let plan = state
        .plan_generation_service
        .generate_plan_from_request(&body, state.clock.today())
        .map_err(|e| {
            tracing::info!("Rejected plan request: {}", e);
            e
        })?;

    for day in &plan.training_plan {
        tracing::debug!("{}", day);
    }

    Ok(Json(PlanResponse {
        status: "success",
        plan,
    }))
}
