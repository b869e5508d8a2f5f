use std::env;

pub const STRAVA_AUTHORIZE_URL: &str = "https://www.strava.com/oauth/authorize";
pub const STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";
pub const STRAVA_ACTIVITIES_URL: &str = "https://www.strava.com/api/v3/athlete/activities";
pub const DEFAULT_STRAVA_SCOPE: &str = "read,activity:read_all";

/// Strava OAuth application settings. Empty credentials leave the
/// integration disabled.
#[derive(Debug, Clone)]
pub struct StravaConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub authorize_url: String,
    pub token_url: String,
    pub activities_url: String,
}

impl StravaConfig {
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            scope: DEFAULT_STRAVA_SCOPE.to_string(),
            authorize_url: STRAVA_AUTHORIZE_URL.to_string(),
            token_url: STRAVA_TOKEN_URL.to_string(),
            activities_url: STRAVA_ACTIVITIES_URL.to_string(),
        }
    }

    pub fn from_env(client_url: &str) -> Self {
        let client_id = env::var("STRAVA_CLIENT_ID").unwrap_or_default();
        let client_secret = env::var("STRAVA_CLIENT_SECRET").unwrap_or_default();
        let redirect_uri = env::var("STRAVA_REDIRECT_URI")
            .unwrap_or_else(|_| format!("{}/devices", client_url));

        let mut config = Self::new(&client_id, &client_secret, &redirect_uri);
        if let Ok(scope) = env::var("STRAVA_SCOPE") {
            config.scope = scope;
        }
        config
    }

    /// Point the token and activity endpoints at another host.
    pub fn with_api_base(mut self, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        self.token_url = format!("{}/oauth/token", base_url);
        self.activities_url = format!("{}/api/v3/athlete/activities", base_url);
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}
