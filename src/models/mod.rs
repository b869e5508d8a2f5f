// Domain models shared by services and handlers

pub mod integration;
pub mod training_plan;
pub mod validation;
pub mod workout_template;

pub use integration::*;
pub use training_plan::*;
pub use validation::*;
pub use workout_template::*;
