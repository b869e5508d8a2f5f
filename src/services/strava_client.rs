use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

use crate::config::StravaConfig;
use crate::models::{StravaActivity, StravaTokenResponse};

#[derive(Error, Debug)]
pub enum StravaError {
    #[error("Strava integration is not configured on the server.")]
    NotConfigured,
    #[error("Missing required Strava OAuth fields.")]
    MissingOAuthFields,
    #[error("Invalid or expired Strava OAuth state. Please reconnect.")]
    InvalidState,
    #[error("Strava connection not found.")]
    ConnectionNotFound,
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error("Failed to reach Strava: {0}")]
    Request(#[from] reqwest::Error),
}

/// Thin client over the Strava OAuth and activities endpoints.
#[derive(Debug, Clone)]
pub struct StravaClient {
    client: Client,
    config: StravaConfig,
}

impl StravaClient {
    pub fn new(config: StravaConfig) -> Result<Self, StravaError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &StravaConfig {
        &self.config
    }

    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&response_type=code&redirect_uri={}\
             &approval_prompt=auto&scope={}&state={}",
            self.config.authorize_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&self.config.scope),
            urlencoding::encode(state),
        )
    }

    pub async fn exchange_code(&self, code: &str) -> Result<StravaTokenResponse, StravaError> {
        self.post_token(&[
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ])
        .await
    }

    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<StravaTokenResponse, StravaError> {
        self.post_token(&[
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn post_token(
        &self,
        params: &[(&str, &str)],
    ) -> Result<StravaTokenResponse, StravaError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(params)
            .send()
            .await?;

        let body = read_json(response, "Failed to authenticate with Strava").await?;
        serde_json::from_value(body).map_err(|e| {
            error!("Unexpected Strava token response: {}", e);
            StravaError::Upstream {
                status: 502,
                message: "Failed to authenticate with Strava".to_string(),
            }
        })
    }

    /// First page of the athlete's activities, newest first. Entries that do
    /// not look like activities are dropped.
    pub async fn fetch_activities(
        &self,
        access_token: &str,
        per_page: u32,
    ) -> Result<Vec<StravaActivity>, StravaError> {
        let response = self
            .client
            .get(&self.config.activities_url)
            .query(&[("per_page", per_page), ("page", 1)])
            .bearer_auth(access_token)
            .send()
            .await?;

        let body = read_json(response, "Failed to fetch Strava activities.").await?;
        let activities = match body {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        };
        Ok(activities)
    }
}

/// Parse a JSON body, turning non-2xx responses into `StravaError::Upstream`
/// carrying Strava's own message where it gave one.
async fn read_json(response: Response, fallback: &str) -> Result<Value, StravaError> {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(body);
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| {
            body.pointer("/errors/0/resource")
                .and_then(Value::as_str)
        })
        .unwrap_or(fallback)
        .to_string();

    warn!("Strava request failed: {} - {}", status, message);
    Err(StravaError::Upstream {
        status: status.as_u16(),
        message,
    })
}
