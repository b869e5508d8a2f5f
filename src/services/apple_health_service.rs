use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{AppleHealthConnection, HealthWorkout, WorkoutSummary};

use super::clock::Clock;
use super::integration_store::{generate_id, IntegrationStore};
use super::units::{normalize_distance_km, normalize_duration_min, round_to, to_number};

pub const MAX_IMPORT_WORKOUTS: usize = 10_000;
pub const RECENT_WORKOUT_LIMIT: usize = 25;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("No Apple Health workouts provided.")]
    NoWorkouts,
    #[error("Payload too large. Please import 10,000 workouts or fewer at a time.")]
    TooManyWorkouts,
    #[error("No valid running workouts found in the Apple Health data.")]
    NoValidWorkouts,
}

/// Parse the date formats seen in Apple Health exports into UTC.
///
/// Accepts RFC 3339, the export's `YYYY-MM-DD HH:MM:SS -0700` form, naive
/// `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS` (taken as UTC), bare dates
/// (UTC midnight) and epoch milliseconds.
pub fn parse_workout_date(value: &Value) -> Option<DateTime<Utc>> {
    let text = match value {
        Value::Number(n) => return n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::String(s) => s.trim(),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S %z") {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
}

fn field<'a>(workout: &'a Value, name: &str) -> Option<&'a Value> {
    workout.get(name).filter(|v| !v.is_null())
}

fn unit_of<'a>(workout: &'a Value, name: &str) -> &'a str {
    workout.get(name).and_then(Value::as_str).unwrap_or("")
}

fn text_or<'a>(workout: &'a Value, names: &[&str], default: &'a str) -> &'a str {
    names
        .iter()
        .find_map(|name| workout.get(*name).and_then(Value::as_str).filter(|s| !s.is_empty()))
        .unwrap_or(default)
}

fn distance_km(workout: &Value) -> Option<f64> {
    let candidates = [
        ("distanceKm", "km"),
        ("distance", unit_of(workout, "distanceUnit")),
        ("totalDistance", unit_of(workout, "totalDistanceUnit")),
        ("distanceMeters", "m"),
        ("distanceMiles", "mi"),
    ];
    candidates.iter().find_map(|(name, unit)| {
        field(workout, name)
            .and_then(to_number)
            .map(|value| normalize_distance_km(value, unit))
    })
}

fn duration_min(workout: &Value) -> Option<f64> {
    let candidates = [
        ("durationMin", "min"),
        ("duration", unit_of(workout, "durationUnit")),
        ("totalDuration", unit_of(workout, "totalDurationUnit")),
        ("durationSeconds", "s"),
    ];
    candidates.iter().find_map(|(name, unit)| {
        field(workout, name)
            .and_then(to_number)
            .map(|value| normalize_duration_min(value, unit))
    })
}

/// Normalize one client-extracted workout. `None` when it has no usable
/// start date or neither a positive distance nor a positive duration.
pub fn normalize_workout(workout: &Value) -> Option<HealthWorkout> {
    let start_date = ["startDate", "date", "workoutDate"]
        .iter()
        .find_map(|name| field(workout, name))
        .and_then(parse_workout_date)?;

    let distance_km = distance_km(workout).map(|km| round_to(km, 2));
    let duration_min = duration_min(workout).map(|min| round_to(min, 1));

    let has_distance = distance_km.is_some_and(|km| km > 0.0);
    let has_duration = duration_min.is_some_and(|min| min > 0.0);
    if !has_distance && !has_duration {
        return None;
    }

    Some(HealthWorkout {
        start_date,
        distance_km,
        duration_min,
        calories: field(workout, "calories")
            .and_then(to_number)
            .map(|kcal| round_to(kcal, 1)),
        workout_type: text_or(workout, &["type", "workoutType"], "Running").to_string(),
        source: text_or(workout, &["source"], "Apple Health").to_string(),
    })
}

/// Normalize a batch, newest first.
pub fn normalize_workouts(workouts: &[Value]) -> Vec<HealthWorkout> {
    let mut normalized: Vec<HealthWorkout> =
        workouts.iter().filter_map(normalize_workout).collect();
    normalized.sort_by(|a, b| b.start_date.cmp(&a.start_date));

    debug!(
        "Normalized {} of {} Apple Health workouts",
        normalized.len(),
        workouts.len()
    );
    normalized
}

/// Totals over workouts sorted newest first.
pub fn summarize_workouts(workouts: &[HealthWorkout]) -> WorkoutSummary {
    let total_distance_km: f64 = workouts.iter().filter_map(|w| w.distance_km).sum();
    let total_duration_min: f64 = workouts.iter().filter_map(|w| w.duration_min).sum();

    WorkoutSummary {
        workout_count: workouts.len(),
        total_distance_km: round_to(total_distance_km, 2),
        total_duration_hours: round_to(total_duration_min / 60.0, 2),
        latest_workout_date: workouts.first().map(|w| w.start_date),
    }
}

#[derive(Clone)]
pub struct AppleHealthService {
    store: IntegrationStore,
    clock: Arc<dyn Clock>,
}

impl AppleHealthService {
    pub fn new(store: IntegrationStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Replace the stored workouts for a connection. Unknown connection ids
    /// get a fresh id rather than being adopted.
    pub async fn import(
        &self,
        connection_id: Option<&str>,
        workouts: Option<&Value>,
    ) -> Result<AppleHealthConnection, ImportError> {
        let workouts = workouts
            .and_then(Value::as_array)
            .filter(|w| !w.is_empty())
            .ok_or(ImportError::NoWorkouts)?;

        if workouts.len() > MAX_IMPORT_WORKOUTS {
            return Err(ImportError::TooManyWorkouts);
        }

        let normalized = normalize_workouts(workouts);
        if normalized.is_empty() {
            return Err(ImportError::NoValidWorkouts);
        }

        let known = match connection_id {
            Some(id) => self.store.has_apple_health_connection(id).await,
            None => false,
        };
        let id = match connection_id {
            Some(id) if known => id.to_string(),
            _ => generate_id("apple"),
        };

        let connection = AppleHealthConnection {
            id,
            last_sync: self.clock.now(),
            summary: summarize_workouts(&normalized),
            workouts: normalized,
        };
        self.store.put_apple_health_connection(connection.clone()).await;

        info!(
            "Imported {} Apple Health workouts into {}",
            connection.summary.workout_count, connection.id
        );
        Ok(connection)
    }

    pub async fn status(&self, connection_id: &str) -> Option<AppleHealthConnection> {
        self.store.apple_health_connection(connection_id).await
    }

    pub async fn disconnect(&self, connection_id: Option<&str>) {
        if let Some(id) = connection_id {
            if self.store.remove_apple_health_connection(id).await {
                info!("Disconnected Apple Health import {}", id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::FixedClock;
    use chrono::{Datelike, TimeZone};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn service() -> AppleHealthService {
        AppleHealthService::new(
            IntegrationStore::new(),
            Arc::new(FixedClock::new(utc(2026, 10, 19, 9, 0, 0))),
        )
    }

    #[test]
    fn test_parse_workout_dates() {
        assert_eq!(
            parse_workout_date(&json!("2026-10-18T07:30:00Z")),
            Some(utc(2026, 10, 18, 7, 30, 0))
        );
        assert_eq!(
            parse_workout_date(&json!("2026-10-18 07:30:00 -0700")),
            Some(utc(2026, 10, 18, 14, 30, 0))
        );
        assert_eq!(
            parse_workout_date(&json!("2026-10-18T07:30:00")),
            Some(utc(2026, 10, 18, 7, 30, 0))
        );
        assert_eq!(
            parse_workout_date(&json!("2026-10-18")),
            Some(utc(2026, 10, 18, 0, 0, 0))
        );
        assert_eq!(
            parse_workout_date(&json!(1_792_310_400_000i64)),
            DateTime::from_timestamp_millis(1_792_310_400_000)
        );
        assert_eq!(parse_workout_date(&json!("yesterday")), None);
        assert_eq!(parse_workout_date(&json!("")), None);
    }

    #[test]
    fn test_field_precedence_and_units() {
        let workout = json!({
            "startDate": "2026-10-18T07:00:00Z",
            "distance": 3.1,
            "distanceUnit": "mi",
            "distanceMeters": 9999,
            "totalDuration": 0.5,
            "totalDurationUnit": "hr",
            "calories": "312.46",
        });

        let normalized = normalize_workout(&workout).unwrap();
        assert_eq!(normalized.distance_km, Some(4.99));
        assert_eq!(normalized.duration_min, Some(30.0));
        assert_eq!(normalized.calories, Some(312.5));
        assert_eq!(normalized.workout_type, "Running");
        assert_eq!(normalized.source, "Apple Health");
    }

    #[test]
    fn test_fallback_fields() {
        let workout = json!({
            "date": "2026-10-18",
            "distanceMeters": 5000,
            "durationSeconds": 1800,
            "workoutType": "Walking",
            "source": "Watch",
        });

        let normalized = normalize_workout(&workout).unwrap();
        assert_eq!(normalized.distance_km, Some(5.0));
        assert_eq!(normalized.duration_min, Some(30.0));
        assert_eq!(normalized.workout_type, "Walking");
        assert_eq!(normalized.source, "Watch");
    }

    #[test]
    fn test_rejects_unusable_workouts() {
        let zero_distance = json!({ "startDate": "2026-10-18", "distanceKm": 0 });
        let bad_date = json!({ "startDate": "not a date", "distanceKm": 5 });
        let duration_only = json!({ "startDate": "2026-10-18", "durationMin": 12 });

        assert!(normalize_workout(&json!({ "distanceKm": 5 })).is_none());
        assert!(normalize_workout(&zero_distance).is_none());
        assert!(normalize_workout(&bad_date).is_none());
        assert!(normalize_workout(&duration_only).is_some());
    }

    #[test]
    fn test_sorted_newest_first_and_summarized() {
        let workouts = vec![
            json!({ "startDate": "2026-10-10T07:00:00Z", "distanceKm": 5, "durationMin": 30 }),
            json!({ "startDate": "2026-10-17T07:00:00Z", "distanceKm": 10, "durationMin": 60 }),
            json!({ "startDate": "2026-10-12T07:00:00Z", "durationMin": 45 }),
        ];

        let normalized = normalize_workouts(&workouts);
        let dates: Vec<u32> = normalized.iter().map(|w| w.start_date.day()).collect();
        assert_eq!(dates, vec![17, 12, 10]);

        let summary = summarize_workouts(&normalized);
        assert_eq!(summary.workout_count, 3);
        assert_eq!(summary.total_distance_km, 15.0);
        assert_eq!(summary.total_duration_hours, 2.25);
        assert_eq!(summary.latest_workout_date, Some(utc(2026, 10, 17, 7, 0, 0)));
    }

    #[tokio::test]
    async fn test_import_errors() {
        let service = service();

        assert_eq!(service.import(None, None).await.unwrap_err(), ImportError::NoWorkouts);
        assert_eq!(
            service.import(None, Some(&json!([]))).await.unwrap_err(),
            ImportError::NoWorkouts
        );
        assert_eq!(
            service.import(None, Some(&json!({ "a": 1 }))).await.unwrap_err(),
            ImportError::NoWorkouts
        );

        let too_many = Value::Array(vec![json!({}); MAX_IMPORT_WORKOUTS + 1]);
        assert_eq!(
            service.import(None, Some(&too_many)).await.unwrap_err(),
            ImportError::TooManyWorkouts
        );
        assert_eq!(
            service.import(None, Some(&json!([{ "distanceKm": 3 }]))).await.unwrap_err(),
            ImportError::NoValidWorkouts
        );
    }

    #[tokio::test]
    async fn test_import_reuses_only_known_connections() {
        let service = service();
        let workouts = json!([{ "startDate": "2026-10-18", "distanceKm": 5 }]);

        let first = service.import(Some("apple_unknown"), Some(&workouts)).await.unwrap();
        assert_ne!(first.id, "apple_unknown");
        assert!(first.id.starts_with("apple_"));
        assert_eq!(first.last_sync, utc(2026, 10, 19, 9, 0, 0));

        let second = service.import(Some(first.id.as_str()), Some(&workouts)).await.unwrap();
        assert_eq!(second.id, first.id);

        assert!(service.status(&first.id).await.is_some());
        service.disconnect(Some(first.id.as_str())).await;
        assert!(service.status(&first.id).await.is_none());
    }
}
