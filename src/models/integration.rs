use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Strava
// ---------------------------------------------------------------------------

/// Response from the Strava token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub athlete: Option<Value>,
}

/// Activity as returned by `/athlete/activities`. Only the fields we read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StravaActivity {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub start_date: Option<String>,
    /// Meters.
    pub distance: Option<f64>,
    /// Seconds.
    pub moving_time: Option<f64>,
    /// Meters per second.
    pub average_speed: Option<f64>,
    pub total_elevation_gain: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningActivity {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub start_date: Option<String>,
    pub distance_km: f64,
    pub moving_time_min: f64,
    pub average_pace_min_per_km: Option<f64>,
    pub elevation_gain_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub activity_count: usize,
    pub total_distance_km: f64,
    pub total_moving_hours: f64,
    pub synced_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StravaOAuthState {
    pub created_at: DateTime<Utc>,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct StravaConnection {
    pub id: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds.
    pub expires_at: Option<i64>,
    pub athlete: Option<Value>,
    pub last_sync: Option<DateTime<Utc>>,
    pub last_summary: Option<ActivitySummary>,
}

// ---------------------------------------------------------------------------
// Apple Health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthWorkout {
    pub start_date: DateTime<Utc>,
    pub distance_km: Option<f64>,
    pub duration_min: Option<f64>,
    pub calories: Option<f64>,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub workout_count: usize,
    pub total_distance_km: f64,
    pub total_duration_hours: f64,
    pub latest_workout_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct AppleHealthConnection {
    pub id: String,
    pub last_sync: DateTime<Utc>,
    pub summary: WorkoutSummary,
    /// Newest first.
    pub workouts: Vec<HealthWorkout>,
}
