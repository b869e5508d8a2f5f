use chrono::{Datelike, Days, NaiveDate};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    validate_plan_request, FitnessLevel, Gender, GeneratedPlan, ScheduledDay, UserProfile,
    ValidationError, WorkoutTemplate,
};

use super::schedule_store::ScheduleStore;

/// Weekly mileage may grow by at most this factor.
pub const MAX_WEEKLY_INCREASE: f64 = 1.1;
pub const PLAN_LENGTH_DAYS: u64 = 7;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No workout schedules found for fitness level: {0}")]
    NoScheduleForLevel(FitnessLevel),
}

#[derive(Clone)]
pub struct PlanGenerationService {
    store: Arc<ScheduleStore>,
}

impl PlanGenerationService {
    pub fn new(store: Arc<ScheduleStore>) -> Self {
        Self { store }
    }

    /// Validate a raw request body, then generate. Nothing is computed for
    /// an invalid body.
    pub fn generate_plan_from_request(
        &self,
        body: &Value,
        today: NaiveDate,
    ) -> Result<GeneratedPlan, PlanError> {
        let profile = validate_plan_request(body)?;
        self.generate_plan(&profile, today)
    }

    pub fn generate_plan(
        &self,
        profile: &UserProfile,
        today: NaiveDate,
    ) -> Result<GeneratedPlan, PlanError> {
        let target_weekly_mileage = calculate_target_weekly_mileage(
            profile.age,
            profile.weight,
            profile.gender,
            profile.weekly_mileage,
        );
        let fitness_level = FitnessLevel::from_target_mileage(target_weekly_mileage);

        debug!(
            "Target weekly mileage {} ({}) from current {}",
            target_weekly_mileage, fitness_level, profile.weekly_mileage
        );

        let training_plan = assemble_weekly_schedule(fitness_level, &self.store, today)?;

        Ok(GeneratedPlan {
            fitness_level,
            target_weekly_mileage,
            training_plan,
        })
    }
}

fn age_factor(age: f64) -> f64 {
    if age > 40.0 {
        0.95 - (age - 40.0) * 0.01
    } else {
        1.0
    }
}

/// Weight in kilograms.
fn weight_factor(weight: f64) -> f64 {
    if weight > 80.0 {
        0.95 - (weight - 80.0) * 0.005
    } else {
        1.0
    }
}

// Other shares the male factor.
fn gender_factor(gender: Gender) -> f64 {
    match gender {
        Gender::Female => 0.9,
        Gender::Male | Gender::Other => 1.0,
    }
}

/// Recommended mileage for the coming week, never more than 10% above the
/// current mileage.
pub fn calculate_target_weekly_mileage(
    age: f64,
    weight: f64,
    gender: Gender,
    current_weekly_mileage: f64,
) -> u32 {
    let raw = current_weekly_mileage
        * age_factor(age)
        * weight_factor(weight)
        * gender_factor(gender);
    let capped = raw.min(current_weekly_mileage * MAX_WEEKLY_INCREASE);

    // Validated inputs keep every factor positive, so this never clamps.
    capped.round().max(0.0) as u32
}

/// Seven consecutive days starting at `today`, each filled from the level's
/// template for that weekday. Weekday gaps fall back to the level's
/// earliest template.
pub fn assemble_weekly_schedule(
    level: FitnessLevel,
    store: &ScheduleStore,
    today: NaiveDate,
) -> Result<Vec<ScheduledDay>, PlanError> {
    let mut templates = store.for_level(level);
    if templates.is_empty() {
        return Err(PlanError::NoScheduleForLevel(level));
    }
    templates.sort_by_key(|t| t.day_of_week);

    let start_weekday = today.weekday().num_days_from_sunday() as u64;

    let schedule = (0..PLAN_LENGTH_DAYS)
        .map(|offset| {
            let day_of_week = ((start_weekday + offset) % 7 + 1) as u8;
            let template = templates
                .iter()
                .find(|t| t.day_of_week == day_of_week)
                .copied()
                .unwrap_or_else(|| {
                    warn!(
                        "No {} template for day {}, falling back to day {}",
                        level, day_of_week, templates[0].day_of_week
                    );
                    templates[0]
                });

            scheduled_day(template, today + Days::new(offset))
        })
        .collect();

    Ok(schedule)
}

fn scheduled_day(template: &WorkoutTemplate, date: NaiveDate) -> ScheduledDay {
    ScheduledDay {
        workout_type: template.workout_type.clone(),
        distance: template.distance,
        duration: template.duration,
        pace: template.pace.clone(),
        date,
        formatted_date: ScheduledDay::format_date(date),
    }
}
