use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{
    ActivitySummary, AppleHealthConnection, StravaConnection, StravaOAuthState,
    StravaTokenResponse,
};

/// OAuth states older than this are discarded.
pub const STRAVA_STATE_TTL_MINUTES: i64 = 10;

/// `<prefix>_<24 hex chars>` from 12 random bytes.
pub fn generate_id(prefix: &str) -> String {
    let bytes: [u8; 12] = rand::random();
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}_{}", prefix, hex)
}

#[derive(Debug, Default)]
struct IntegrationMaps {
    strava_states: HashMap<String, StravaOAuthState>,
    strava_connections: HashMap<String, StravaConnection>,
    apple_health_connections: HashMap<String, AppleHealthConnection>,
}

/// Process-memory integration state. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct IntegrationStore {
    inner: Arc<RwLock<IntegrationMaps>>,
}

impl IntegrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_strava_state(&self, state: String, details: StravaOAuthState) {
        self.inner.write().await.strava_states.insert(state, details);
    }

    /// Remove and return an OAuth state; each state is single-use.
    pub async fn take_strava_state(&self, state: &str) -> Option<StravaOAuthState> {
        self.inner.write().await.strava_states.remove(state)
    }

    /// Drop OAuth states created more than the TTL before `now`.
    pub async fn sweep_expired_strava_states(&self, now: DateTime<Utc>) -> usize {
        let ttl = Duration::minutes(STRAVA_STATE_TTL_MINUTES);
        let mut maps = self.inner.write().await;
        let before = maps.strava_states.len();
        maps.strava_states
            .retain(|_, details| now.signed_duration_since(details.created_at) <= ttl);

        let removed = before - maps.strava_states.len();
        if removed > 0 {
            debug!("Removed {} expired Strava OAuth states", removed);
        }
        removed
    }

    pub async fn strava_connection(&self, id: &str) -> Option<StravaConnection> {
        self.inner.read().await.strava_connections.get(id).cloned()
    }

    pub async fn put_strava_connection(&self, connection: StravaConnection) {
        self.inner
            .write()
            .await
            .strava_connections
            .insert(connection.id.clone(), connection);
    }

    /// Swap in refreshed tokens. Returns `None` when the connection was
    /// removed while the refresh was in flight.
    pub async fn apply_strava_refresh(
        &self,
        id: &str,
        tokens: StravaTokenResponse,
    ) -> Option<StravaConnection> {
        let mut maps = self.inner.write().await;
        let connection = maps.strava_connections.get_mut(id)?;
        connection.access_token = tokens.access_token;
        connection.refresh_token = tokens.refresh_token;
        connection.expires_at = tokens.expires_at;
        if tokens.athlete.is_some() {
            connection.athlete = tokens.athlete;
        }
        Some(connection.clone())
    }

    /// Record a finished sync on a connection that still exists.
    pub async fn record_strava_sync(&self, id: &str, summary: &ActivitySummary) -> bool {
        match self.inner.write().await.strava_connections.get_mut(id) {
            Some(connection) => {
                connection.last_sync = Some(summary.synced_at);
                connection.last_summary = Some(summary.clone());
                true
            }
            None => false,
        }
    }

    pub async fn remove_strava_connection(&self, id: &str) -> bool {
        self.inner.write().await.strava_connections.remove(id).is_some()
    }

    pub async fn apple_health_connection(&self, id: &str) -> Option<AppleHealthConnection> {
        self.inner.read().await.apple_health_connections.get(id).cloned()
    }

    pub async fn has_apple_health_connection(&self, id: &str) -> bool {
        self.inner.read().await.apple_health_connections.contains_key(id)
    }

    pub async fn put_apple_health_connection(&self, connection: AppleHealthConnection) {
        self.inner
            .write()
            .await
            .apple_health_connections
            .insert(connection.id.clone(), connection);
    }

    pub async fn remove_apple_health_connection(&self, id: &str) -> bool {
        self.inner
            .write()
            .await
            .apple_health_connections
            .remove(id)
            .is_some()
    }
}
