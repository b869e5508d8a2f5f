use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{FitnessLevel, WorkoutTemplate};

#[derive(Error, Debug)]
pub enum ScheduleStoreError {
    #[error("Training schedules file not found: {0}")]
    NotFound(String),
    #[error("Failed to read training schedules: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse training schedules: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid training schedule on line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
    #[error("No valid training schedules found")]
    Empty,
}

/// Raw CSV row. Every column is optional so incomplete rows can be skipped
/// rather than aborting the load.
#[derive(Debug, Deserialize)]
struct ScheduleRow {
    day_of_week: Option<String>,
    workout_type: Option<String>,
    distance: Option<String>,
    duration: Option<String>,
    pace: Option<String>,
    level_of_fitness: Option<String>,
}

impl ScheduleRow {
    /// `Ok(None)` for rows without a day or workout type.
    fn into_template(self, line: u64) -> Result<Option<WorkoutTemplate>, ScheduleStoreError> {
        let invalid = |reason: String| ScheduleStoreError::InvalidRow { line, reason };

        let day_of_week = non_empty(self.day_of_week);
        let workout_type = non_empty(self.workout_type);
        let (day_of_week, workout_type) = match (day_of_week, workout_type) {
            (Some(day), Some(workout_type)) => (day, workout_type),
            _ => return Ok(None),
        };

        let day_of_week = day_of_week
            .parse::<u8>()
            .ok()
            .filter(|day| (1..=7).contains(day))
            .ok_or_else(|| invalid(format!("day_of_week must be 1-7, got {:?}", day_of_week)))?;

        let distance_raw = non_empty(self.distance).unwrap_or_default();
        let distance = distance_raw
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| {
                invalid(format!(
                    "distance must be a non-negative number, got {:?}",
                    distance_raw
                ))
            })?;

        let duration_raw = non_empty(self.duration).unwrap_or_default();
        let duration = duration_raw
            .parse::<u32>()
            .map_err(|_| {
                invalid(format!("duration must be whole minutes, got {:?}", duration_raw))
            })?;

        let level_of_fitness = non_empty(self.level_of_fitness)
            .unwrap_or_default()
            .parse::<FitnessLevel>()
            .map_err(invalid)?;

        Ok(Some(WorkoutTemplate {
            day_of_week,
            workout_type,
            distance,
            duration,
            pace: non_empty(self.pace).unwrap_or_default(),
            level_of_fitness,
        }))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Workout templates loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct ScheduleStore {
    templates: Vec<WorkoutTemplate>,
}

impl ScheduleStore {
    pub fn new(templates: Vec<WorkoutTemplate>) -> Result<Self, ScheduleStoreError> {
        if templates.is_empty() {
            return Err(ScheduleStoreError::Empty);
        }
        Ok(Self { templates })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScheduleStoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScheduleStoreError::NotFound(path.display().to_string()));
        }

        let store = Self::from_reader(File::open(path)?)?;
        info!(
            "Loaded {} training schedules from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScheduleStoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = reader.headers()?.clone();

        let mut templates = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let row: ScheduleRow = record.deserialize(Some(&headers))?;

            match row.into_template(line)? {
                Some(template) => templates.push(template),
                None => debug!("Skipping incomplete training schedule on line {}", line),
            }
        }

        Self::new(templates)
    }

    pub fn templates(&self) -> &[WorkoutTemplate] {
        &self.templates
    }

    /// Templates for one level, in file order.
    pub fn for_level(&self, level: FitnessLevel) -> Vec<&WorkoutTemplate> {
        self.templates
            .iter()
            .filter(|t| t.level_of_fitness == level)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
