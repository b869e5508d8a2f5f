use serde_json::Value;
use thiserror::Error;

use super::training_plan::{Gender, UserProfile};

pub const AGE_RANGE: std::ops::RangeInclusive<f64> = 13.0..=100.0;
pub const WEIGHT_RANGE_KG: std::ops::RangeInclusive<f64> = 30.0..=200.0;
pub const WEEKLY_MILEAGE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=50.0;

/// The first rule a plan request breaks. Display strings are sent to clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Age must be a number between 13 and 100")]
    Age,
    #[error("Weight must be a number between 30 and 200")]
    Weight,
    #[error("Gender must be male, female, or other")]
    Gender,
    #[error("Weekly mileage must be a number between 0 and 50")]
    WeeklyMileage,
}

/// Validate a raw plan request body. Rules are checked in order and the
/// first failure is reported. A present `null` counts as present but fails
/// the type check for its field.
pub fn validate_plan_request(body: &Value) -> Result<UserProfile, ValidationError> {
    let (age, weight, gender, weekly_mileage) = match (
        body.get("age"),
        body.get("weight"),
        body.get("gender"),
        body.get("weeklyMileage"),
    ) {
        (Some(age), Some(weight), Some(gender), Some(weekly_mileage)) => {
            (age, weight, gender, weekly_mileage)
        }
        _ => return Err(ValidationError::MissingFields),
    };

    let age = number_in_range(age, &AGE_RANGE).ok_or(ValidationError::Age)?;
    let weight = number_in_range(weight, &WEIGHT_RANGE_KG).ok_or(ValidationError::Weight)?;
    let gender = gender
        .as_str()
        .and_then(|g| g.parse::<Gender>().ok())
        .ok_or(ValidationError::Gender)?;
    let weekly_mileage = number_in_range(weekly_mileage, &WEEKLY_MILEAGE_RANGE)
        .ok_or(ValidationError::WeeklyMileage)?;

    Ok(UserProfile {
        age,
        weight,
        gender,
        weekly_mileage,
    })
}

fn number_in_range(value: &Value, range: &std::ops::RangeInclusive<f64>) -> Option<f64> {
    value.as_f64().filter(|n| range.contains(n))
}
