//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ROUSE_API_BASE_URL` - Base URL of the Rouse backend API
//!   (e.g., <https://api.rouse.shop>)
//!
//! ## Optional
//! - `ROUSE_CART_STORAGE_PATH` - Directory for the durable cart snapshot.
//!   When unset, callers typically fall back to an in-memory store and the
//!   cart does not survive a restart.

use std::env;
use std::path::PathBuf;

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

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Base URL of the Rouse backend API
    pub api_base_url: Url,
    /// Directory holding the durable cart snapshot
    pub storage_path: Option<PathBuf>,
}

impl CartConfig {
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

        let raw_url = env::var("ROUSE_API_BASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("ROUSE_API_BASE_URL".to_string()))?;
        let api_base_url = parse_base_url(&raw_url)?;

        let storage_path = env::var("ROUSE_CART_STORAGE_PATH").ok().map(PathBuf::from);

        Ok(Self {
            api_base_url,
            storage_path,
        })
    }
}

/// Parse and validate the API base URL.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| {
        ConfigError::InvalidEnvVar("ROUSE_API_BASE_URL".to_string(), e.to_string())
    })?;

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            "ROUSE_API_BASE_URL".to_string(),
            "URL must have a host".to_string(),
        ));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_accepts_https() {
        let url = parse_base_url("https://api.rouse.shop").expect("valid URL");
        assert_eq!(url.host_str(), Some("api.rouse.shop"));
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        let err = parse_base_url("not a url").expect_err("should fail");
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "ROUSE_API_BASE_URL"));
    }

    #[test]
    fn test_parse_base_url_rejects_hostless() {
        let err = parse_base_url("data:text/plain,hello").expect_err("should fail");
        assert!(err.to_string().contains("host"));
    }
}
