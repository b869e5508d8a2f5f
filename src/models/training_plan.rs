use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::workout_template::FitnessLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(()),
        }
    }
}

/// A validated plan request. Weight is in kilograms, mileage in miles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age: f64,
    pub weight: f64,
    pub gender: Gender,
    pub weekly_mileage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledDay {
    pub workout_type: String,
    pub distance: f64,
    pub duration: u32,
    pub pace: String,
    pub date: NaiveDate,
    pub formatted_date: String,
}

impl ScheduledDay {
    /// Short display form, e.g. `Mon, Oct 19`.
    pub fn format_date(date: NaiveDate) -> String {
        date.format("%a, %b %-d").to_string()
    }

    /// Pace for display, `N/A` when the workout has none.
    pub fn display_pace(&self) -> &str {
        format_pace(&self.pace)
    }
}

impl fmt::Display for ScheduledDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} - {} miles - {} minutes - {} pace",
            self.formatted_date,
            self.workout_type,
            self.distance,
            self.duration,
            self.display_pace()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlan {
    pub fitness_level: FitnessLevel,
    pub target_weekly_mileage: u32,
    pub training_plan: Vec<ScheduledDay>,
}

/// Empty paces and the `0:00` placeholder render as `N/A`.
pub fn format_pace(pace: &str) -> &str {
    if pace.is_empty() || pace == "0:00" {
        "N/A"
    } else {
        pace
    }
}
