mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

use common::{
    bundled_store, create_test_app, default_app, send, send_request, unconfigured_strava,
};
use training_fox::models::{FitnessLevel, WorkoutTemplate};
use training_fox::services::ScheduleStore;

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = default_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "training-fox");
}

#[tokio::test]
async fn test_training_schedules_lists_templates() {
    let app = default_app();
    let (status, body) = send(&app, Method::GET, "/api/training-schedules", None).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), bundled_store().len());
    assert_eq!(rows[0]["day_of_week"], 1);
    assert_eq!(rows[0]["level_of_fitness"], "Beginner");
}

#[tokio::test]
async fn test_generate_plan_success() {
    let app = default_app();
    let request = json!({ "age": 30, "weight": 70, "gender": "male", "weeklyMileage": 20 });

    let (status, body) = send(&app, Method::POST, "/api/generate-plan", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["fitnessLevel"], "Intermediate");
    assert_eq!(body["targetWeeklyMileage"], 20);

    let plan = body["trainingPlan"].as_array().unwrap();
    assert_eq!(plan.len(), 7);

    // The fixed clock is a Monday, which selects day 2 of the table first.
    assert_eq!(
        plan[0],
        json!({
            "workoutType": "Easy Run",
            "distance": 3.0,
            "duration": 30,
            "pace": "10:00",
            "date": "2026-10-19",
            "formattedDate": "Mon, Oct 19",
        })
    );
    assert_eq!(plan[6]["date"], "2026-10-25");
    assert_eq!(plan[6]["workoutType"], "Rest");
    assert_eq!(plan[6]["pace"], "0:00");
}

#[tokio::test]
async fn test_generate_plan_is_deterministic() {
    let app = default_app();
    let request = json!({ "age": 45, "weight": 70, "gender": "Female", "weeklyMileage": 20 });

    let (_, first) = send(&app, Method::POST, "/api/generate-plan", Some(request.clone())).await;
    let (_, second) = send(&app, Method::POST, "/api/generate-plan", Some(request)).await;

    assert_eq!(first["targetWeeklyMileage"], 16);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_generate_plan_validation_errors() {
    let app = default_app();
    let cases = [
        (json!({ "age": 30, "weight": 70, "gender": "male" }), "Missing required fields"),
        (
            json!({ "age": 12, "weight": 70, "gender": "male", "weeklyMileage": 20 }),
            "Age must be a number between 13 and 100",
        ),
        (
            json!({ "age": 30, "weight": "70", "gender": "male", "weeklyMileage": 20 }),
            "Weight must be a number between 30 and 200",
        ),
        (
            json!({ "age": 30, "weight": 70, "gender": "unknown", "weeklyMileage": 20 }),
            "Gender must be male, female, or other",
        ),
        (
            json!({ "age": 30, "weight": 70, "gender": "male", "weeklyMileage": 51 }),
            "Weekly mileage must be a number between 0 and 50",
        ),
    ];

    for (request, message) in cases {
        let (status, body) = send(&app, Method::POST, "/api/generate-plan", Some(request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "status": "error", "message": message }));
    }
}

#[tokio::test]
async fn test_generate_plan_rejects_malformed_json() {
    let app = default_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/generate-plan")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send_request(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_generate_plan_without_json_content_type_is_missing_fields() {
    let app = default_app();
    let profile = json!({ "age": 30, "weight": 70, "gender": "male", "weeklyMileage": 20 });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/generate-plan")
        .body(Body::from(profile.to_string()))
        .unwrap();

    let (status, body) = send_request(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "status": "error", "message": "Missing required fields" })
    );
}

#[tokio::test]
async fn test_generate_plan_missing_level_is_not_found() {
    let store = ScheduleStore::new(vec![WorkoutTemplate {
        day_of_week: 1,
        workout_type: "Walk/Run".to_string(),
        distance: 1.0,
        duration: 20,
        pace: String::new(),
        level_of_fitness: FitnessLevel::Beginner,
    }])
    .unwrap();
    let app = create_test_app(Arc::new(store), unconfigured_strava());

    let request = json!({ "age": 20, "weight": 50, "gender": "male", "weeklyMileage": 50 });
    let (status, body) = send(&app, Method::POST, "/api/generate-plan", Some(request)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "No workout schedules found for fitness level: Advanced"
    );
}

#[tokio::test]
async fn test_sparse_table_still_fills_the_week() {
    let store = ScheduleStore::new(vec![WorkoutTemplate {
        day_of_week: 6,
        workout_type: "Long Run".to_string(),
        distance: 3.0,
        duration: 40,
        pace: "13:00".to_string(),
        level_of_fitness: FitnessLevel::Beginner,
    }])
    .unwrap();
    let app = create_test_app(Arc::new(store), unconfigured_strava());

    let request = json!({ "age": 25, "weight": 60, "gender": "other", "weeklyMileage": 5 });
    let (status, body) = send(&app, Method::POST, "/api/generate-plan", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    let plan = body["trainingPlan"].as_array().unwrap();
    assert_eq!(plan.len(), 7);
    assert!(plan.iter().all(|day| day["workoutType"] == "Long Run"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = default_app();
    let (status, _) = send(&app, Method::GET, "/api/nothing-here", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
