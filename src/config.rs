//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GraphQL endpoint for the custom-activity API
    pub api_endpoint: String,
    /// Authenticated user, if a session exists
    pub user_id: Option<String>,
    /// Path of the local activity log
    pub store_path: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_endpoint: "http://localhost:8080/graphql".to_string(),
            user_id: Some("test-user".to_string()),
            store_path: PathBuf::from("activities.json"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            api_endpoint: env::var("ACTIVITY_API_ENDPOINT")
                .map_err(|_| ConfigError::Missing("ACTIVITY_API_ENDPOINT"))?,
            user_id: env::var("ACTIVITY_USER_ID").ok().filter(|v| !v.is_empty()),
            store_path: env::var("ACTIVITY_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("activities.json")),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
