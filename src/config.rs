//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the wellness-tracking API (no trailing slash)
    pub api_base_url: String,
    /// Path of the persisted session record
    pub session_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `HEALTH_TRACKER_API_URL` defaults to the local dev server;
    /// `HEALTH_TRACKER_SESSION_FILE` defaults to a file under the platform
    /// data directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = env::var("HEALTH_TRACKER_API_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        let session_path = match env::var("HEALTH_TRACKER_SESSION_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_session_path()?,
        };

        Ok(Self {
            api_base_url,
            session_path,
        })
    }
}

/// Default location of the session record: `<data_dir>/health-tracker/session.json`.
fn default_session_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
    Ok(base.join("health-tracker").join("session.json"))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine a data directory; set HEALTH_TRACKER_SESSION_FILE")]
    NoDataDir,
}
