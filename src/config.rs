//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Base URL used when nothing is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// API base URL including its path prefix, without a trailing slash
    pub api_base: String,
    /// JSON file backing the credential store
    pub credentials_path: PathBuf,
    /// Whole-request timeout
    pub http_timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            credentials_path: PathBuf::from(".mlcontent-credentials.json"),
            http_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        // MLCONTENT_API_BASE > VITE_API_BASE > localhost default
        let api_base = env::var("MLCONTENT_API_BASE")
            .or_else(|_| env::var("VITE_API_BASE"))
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let credentials_path = env::var("MLCONTENT_CREDENTIALS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_credentials_path());

        Ok(Self {
            api_base: normalize_base(&api_base)?,
            credentials_path,
            http_timeout: Duration::from_secs(secs_from_env("MLCONTENT_HTTP_TIMEOUT_SECS", 30)),
            connect_timeout: Duration::from_secs(secs_from_env(
                "MLCONTENT_CONNECT_TIMEOUT_SECS",
                10,
            )),
        })
    }

    /// Config pointing at an explicit base URL, other settings defaulted.
    pub fn with_base(api_base: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: normalize_base(api_base)?,
            ..Self::default()
        })
    }
}

fn secs_from_env(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Per-user data directory, falling back to the working directory.
fn default_credentials_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("mlcontent").join("credentials.json"))
        .unwrap_or_else(|| PathBuf::from(".mlcontent-credentials.json"))
}

fn normalize_base(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    reqwest::Url::parse(trimmed).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}
