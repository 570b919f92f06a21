//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CORNERSHOP_API_URL` - Backend base URL (default: `http://127.0.0.1:8000`)
//! - `CORNERSHOP_SESSION_DIR` - Directory for the persisted session
//!   (default: the platform data directory, e.g.
//!   `~/.local/share/cornershop/session` on Linux)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default backend base URL, matching the backend's development bind.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No home directory found for the session store; set CORNERSHOP_SESSION_DIR")]
    NoDataDir,
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL.
    pub api_url: Url,
    /// Directory holding the persisted session keys.
    pub session_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API URL is malformed, or if no session
    /// directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_env_or_default("CORNERSHOP_API_URL", DEFAULT_API_URL)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CORNERSHOP_API_URL".to_owned(), e.to_string())
            })?;

        let session_dir = match get_optional_env("CORNERSHOP_SESSION_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_session_dir()?,
        };

        Ok(Self {
            api_url,
            session_dir,
        })
    }
}

/// Platform data directory for the session store.
fn default_session_dir() -> Result<PathBuf, ConfigError> {
    directories::ProjectDirs::from("dev", "cornershop", "cornershop")
        .map(|dirs| dirs.data_dir().join("session"))
        .ok_or(ConfigError::NoDataDir)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
