use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse runner classification used to pick a template subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    /// Upper bound (inclusive) of target weekly mileage for `Beginner`.
    pub const BEGINNER_MAX_MILES: u32 = 10;
    /// Upper bound (inclusive) of target weekly mileage for `Intermediate`.
    pub const INTERMEDIATE_MAX_MILES: u32 = 25;

    pub fn from_target_mileage(target_weekly_mileage: u32) -> Self {
        if target_weekly_mileage <= Self::BEGINNER_MAX_MILES {
            FitnessLevel::Beginner
        } else if target_weekly_mileage <= Self::INTERMEDIATE_MAX_MILES {
            FitnessLevel::Intermediate
        } else {
            FitnessLevel::Advanced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "Beginner",
            FitnessLevel::Intermediate => "Intermediate",
            FitnessLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitnessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(FitnessLevel::Beginner),
            "intermediate" => Ok(FitnessLevel::Intermediate),
            "advanced" => Ok(FitnessLevel::Advanced),
            other => Err(format!("unknown fitness level: {}", other)),
        }
    }
}

/// One day's prototype workout for a fitness level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    /// 1 = Monday ... 7 = Sunday.
    pub day_of_week: u8,
    pub workout_type: String,
    /// Miles.
    pub distance: f64,
    /// Minutes.
    pub duration: u32,
    pub pace: String,
    pub level_of_fitness: FitnessLevel,
}
