//! Shop client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VEDA_API_BASE_URL` - Base URL of the remote shop API
//!
//! ## Optional
//! - `VEDA_STORAGE_DIR` - Directory for persisted snapshots (default: `.veda`)
//! - `VEDA_HTTP_TIMEOUT_SECS` - HTTP request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop client configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Base URL of the remote shop API (e.g., `https://shop.example.com`).
    pub api_base_url: Url,
    /// Directory where snapshots and session keys are persisted.
    pub storage_dir: PathBuf,
    /// Timeout applied to every HTTP request.
    pub http_timeout: Duration,
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("VEDA_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("VEDA_API_BASE_URL".to_string(), e.to_string())
            })?;
        let storage_dir = PathBuf::from(get_env_or_default("VEDA_STORAGE_DIR", ".veda"));
        let timeout_secs = get_env_or_default("VEDA_HTTP_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("VEDA_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_base_url,
            storage_dir,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Get an environment variable or a default value.
fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
