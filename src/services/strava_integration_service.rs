use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::config::StravaConfig;
use crate::models::{
    ActivitySummary, RunningActivity, StravaActivity, StravaConnection, StravaOAuthState,
};

use super::clock::Clock;
use super::integration_store::{generate_id, IntegrationStore};
use super::strava_client::{StravaClient, StravaError};
use super::units::round_to;

/// Tokens expiring within this many seconds are refreshed before use.
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 120;
pub const DEFAULT_SYNC_LIMIT: u32 = 20;
pub const MAX_SYNC_LIMIT: u32 = 100;

const RUNNING_TYPES: &[&str] = &["Run", "VirtualRun", "TrailRun"];

/// Clamp a client-supplied activity limit to 1..=100. Missing, zero or
/// unparseable values use the default.
pub fn clamp_sync_limit(limit: Option<&Value>) -> u32 {
    let requested = match limit {
        Some(Value::Number(n)) => n.as_f64().map(|n| n.trunc() as i64),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(|n| n.trunc() as i64),
        _ => None,
    }
    .filter(|n| *n != 0)
    .unwrap_or(DEFAULT_SYNC_LIMIT as i64);

    requested.clamp(1, MAX_SYNC_LIMIT as i64) as u32
}

/// Keep running activities and convert to metric display units.
pub fn summarize_running_activities(activities: Vec<StravaActivity>) -> Vec<RunningActivity> {
    activities
        .into_iter()
        .filter(|a| RUNNING_TYPES.contains(&a.activity_type.as_str()))
        .map(|a| RunningActivity {
            id: a.id,
            name: a.name,
            activity_type: a.activity_type,
            start_date: a.start_date,
            distance_km: round_to(a.distance.unwrap_or(0.0) / 1000.0, 2),
            moving_time_min: round_to(a.moving_time.unwrap_or(0.0) / 60.0, 1),
            average_pace_min_per_km: a
                .average_speed
                .filter(|speed| *speed > 0.0)
                .map(|speed| round_to(1000.0 / speed / 60.0, 2)),
            elevation_gain_m: round_to(a.total_elevation_gain.unwrap_or(0.0), 1),
        })
        .collect()
}

#[derive(Clone)]
pub struct StravaIntegrationService {
    client: StravaClient,
    store: IntegrationStore,
    clock: Arc<dyn Clock>,
}

impl StravaIntegrationService {
    pub fn new(
        config: StravaConfig,
        store: IntegrationStore,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StravaError> {
        Ok(Self {
            client: StravaClient::new(config)?,
            store,
            clock,
        })
    }

    pub fn config(&self) -> &StravaConfig {
        self.client.config()
    }

    pub fn is_configured(&self) -> bool {
        self.config().is_configured()
    }

    /// Register a fresh OAuth state and build the authorize URL for it.
    /// Returns `(auth_url, state)`.
    pub async fn create_authorization(
        &self,
        redirect_uri: Option<String>,
    ) -> Result<(String, String), StravaError> {
        if !self.is_configured() {
            return Err(StravaError::NotConfigured);
        }

        let now = self.clock.now();
        self.store.sweep_expired_strava_states(now).await;

        let redirect_uri = redirect_uri
            .filter(|uri| !uri.is_empty())
            .unwrap_or_else(|| self.config().redirect_uri.clone());
        let state = generate_id("strava_state");

        self.store
            .insert_strava_state(
                state.clone(),
                StravaOAuthState {
                    created_at: now,
                    redirect_uri: redirect_uri.clone(),
                },
            )
            .await;

        Ok((self.client.authorization_url(&redirect_uri, &state), state))
    }

    /// Trade an authorization code for tokens and store the new connection.
    pub async fn exchange_code(
        &self,
        code: Option<&str>,
        state: Option<&str>,
    ) -> Result<StravaConnection, StravaError> {
        if !self.is_configured() {
            return Err(StravaError::NotConfigured);
        }

        self.store.sweep_expired_strava_states(self.clock.now()).await;

        let code = code.filter(|c| !c.is_empty());
        let state = state.filter(|s| !s.is_empty());
        let (code, state) = match (code, state) {
            (Some(code), Some(state)) => (code, state),
            _ => return Err(StravaError::MissingOAuthFields),
        };

        self.store
            .take_strava_state(state)
            .await
            .ok_or(StravaError::InvalidState)?;

        let tokens = self.client.exchange_code(code).await?;
        let connection = StravaConnection {
            id: generate_id("strava"),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at: tokens.expires_at,
            athlete: tokens.athlete,
            last_sync: None,
            last_summary: None,
        };

        self.store.put_strava_connection(connection.clone()).await;
        info!("Connected Strava account {}", connection.id);

        Ok(connection)
    }

    /// `None` for unknown connections; otherwise the connection with a token
    /// that is good for at least the refresh margin.
    pub async fn connection_status(
        &self,
        connection_id: &str,
    ) -> Result<Option<StravaConnection>, StravaError> {
        match self.store.strava_connection(connection_id).await {
            Some(connection) => self.ensure_fresh_token(connection).await.map(Some),
            None => Ok(None),
        }
    }

    async fn ensure_fresh_token(
        &self,
        connection: StravaConnection,
    ) -> Result<StravaConnection, StravaError> {
        let now = self.clock.now().timestamp();
        match connection.expires_at {
            Some(expires_at) if expires_at - now <= TOKEN_REFRESH_MARGIN_SECS => {}
            _ => return Ok(connection),
        }

        let refreshed = self.client.refresh_token(&connection.refresh_token).await?;
        let updated = self
            .store
            .apply_strava_refresh(&connection.id, refreshed)
            .await
            .ok_or(StravaError::ConnectionNotFound)?;
        info!("Refreshed Strava token for {}", updated.id);

        Ok(updated)
    }

    /// Pull recent runs and record the sync summary on the connection.
    pub async fn sync(
        &self,
        connection_id: Option<&str>,
        limit: Option<&Value>,
    ) -> Result<(ActivitySummary, Vec<RunningActivity>), StravaError> {
        let connection_id = connection_id
            .filter(|id| !id.is_empty())
            .ok_or(StravaError::ConnectionNotFound)?;
        let connection = self
            .store
            .strava_connection(connection_id)
            .await
            .ok_or(StravaError::ConnectionNotFound)?;

        let connection = self.ensure_fresh_token(connection).await?;
        let per_page = clamp_sync_limit(limit);
        let activities = summarize_running_activities(
            self.client
                .fetch_activities(&connection.access_token, per_page)
                .await?,
        );

        let total_distance_km: f64 = activities.iter().map(|a| a.distance_km).sum();
        let total_moving_min: f64 = activities.iter().map(|a| a.moving_time_min).sum();
        let summary = ActivitySummary {
            activity_count: activities.len(),
            total_distance_km: round_to(total_distance_km, 2),
            total_moving_hours: round_to(total_moving_min / 60.0, 2),
            synced_at: self.clock.now(),
        };

        info!(
            "Synced {} Strava runs for {}",
            summary.activity_count, connection.id
        );

        if !self.store.record_strava_sync(&connection.id, &summary).await {
            info!("Strava connection {} was removed during sync", connection.id);
        }

        Ok((summary, activities))
    }

    pub async fn disconnect(&self, connection_id: Option<&str>) {
        if let Some(id) = connection_id {
            if self.store.remove_strava_connection(id).await {
                info!("Disconnected Strava account {}", id);
            }
        }
    }
}
