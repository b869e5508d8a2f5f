// API routes and handlers

pub mod apple_health;
pub mod error;
pub mod health;
pub mod routes;
pub mod strava;
pub mod training;

pub use error::ApiError;
