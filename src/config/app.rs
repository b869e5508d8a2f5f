use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use super::strava::StravaConfig;

/// Request bodies above this size are rejected before reaching a handler.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub schedules_path: PathBuf,
    pub strava: StravaConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5002".to_string())
            .parse()
            .context("PORT must be a valid port number")?;
        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("NODE_ENV"))
            .unwrap_or_else(|_| "development".to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let client_url =
            env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let schedules_path = env::var("SCHEDULES_CSV_PATH")
            .unwrap_or_else(|_| "data/training_schedules.csv".to_string())
            .into();

        let strava = StravaConfig::from_env(&client_url);

        Ok(AppConfig {
            host,
            port,
            environment,
            log_level,
            schedules_path,
            strava,
        })
    }

    /// Production logs are plain text for collectors; elsewhere they are colored.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "HOST",
        "PORT",
        "ENVIRONMENT",
        "NODE_ENV",
        "LOG_LEVEL",
        "CLIENT_URL",
        "SCHEDULES_CSV_PATH",
        "STRAVA_CLIENT_ID",
        "STRAVA_CLIENT_SECRET",
        "STRAVA_REDIRECT_URI",
        "STRAVA_SCOPE",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = AppConfig::from_env().unwrap();

        assert_eq!(config.server_address(), "0.0.0.0:5002");
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
        assert_eq!(config.schedules_path, PathBuf::from("data/training_schedules.csv"));
        assert_eq!(config.strava.redirect_uri, "http://localhost:3000/devices");
        assert_eq!(config.strava.scope, "read,activity:read_all");
        assert!(!config.strava.is_configured());
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        env::set_var("PORT", "8080");
        env::set_var("NODE_ENV", "production");
        env::set_var("CLIENT_URL", "https://fox.example.com");
        env::set_var("STRAVA_CLIENT_ID", "123");
        env::set_var("STRAVA_CLIENT_SECRET", "secret");

        let config = AppConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.port, 8080);
        assert!(config.is_production());
        assert_eq!(config.strava.redirect_uri, "https://fox.example.com/devices");
        assert!(config.strava.is_configured());
    }

    #[test]
    #[serial]
    fn test_invalid_port() {
        clear_env();
        env::set_var("PORT", "not-a-port");
        let result = AppConfig::from_env();
        clear_env();

        assert!(result.is_err());
    }
}
