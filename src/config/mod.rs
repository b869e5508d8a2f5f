pub mod app;
pub mod strava;

pub use app::AppConfig;
pub use strava::StravaConfig;
