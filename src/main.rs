use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use training_fox::api::routes::create_routes;
use training_fox::config::AppConfig;
use training_fox::services::{ScheduleStore, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_ansi(!config.is_production())
        .init();

    let store = ScheduleStore::from_path(&config.schedules_path)
        .with_context(|| format!("Failed to load {}", config.schedules_path.display()))?;

    if !config.strava.is_configured() {
        info!("Strava credentials not set, Strava integration disabled");
    }

    let app = create_routes(&config, Arc::new(store), Arc::new(SystemClock))?;

    let listener = TcpListener::bind(config.server_address()).await?;
    info!(
        "Training Fox server starting on http://{} ({})",
        config.server_address(),
        config.environment
    );
    info!("Health check available at http://{}/health", config.server_address());

    axum::serve(listener, app).await?;

    Ok(())
}
