// Business logic services

pub mod apple_health_service;
pub mod clock;
pub mod integration_store;
pub mod plan_generation_service;
pub mod schedule_store;
pub mod strava_client;
pub mod strava_integration_service;
pub mod units;

pub use apple_health_service::{AppleHealthService, ImportError};
pub use clock::{Clock, FixedClock, SystemClock};
pub use integration_store::IntegrationStore;
pub use plan_generation_service::{PlanError, PlanGenerationService};
pub use schedule_store::{ScheduleStore, ScheduleStoreError};
pub use strava_client::{StravaClient, StravaError};
pub use strava_integration_service::StravaIntegrationService;
