//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CATALOG_API_URL` - Product API base endpoint (default: `http://localhost:8181/api/products`)
//! - `CATALOG_STORAGE_DIR` - Directory holding the persisted cart (default: `.catalog`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default product API base endpoint.
pub const DEFAULT_API_URL: &str = "http://localhost:8181/api/products";

/// Default directory for the file-backed cart store.
pub const DEFAULT_STORAGE_DIR: &str = ".catalog";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog client configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base endpoint for every product request.
    pub api_url: Url,
    /// Directory where the cart is persisted.
    pub storage_dir: PathBuf,
}

impl CatalogConfig {
    /// Build a configuration pointing at a specific API endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `api_url` is not an absolute http(s) URL.
    pub fn new(api_url: &str, storage_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url("api_url", api_url)?,
            storage_dir: storage_dir.into(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = get_or_default(&lookup, "CATALOG_API_URL", DEFAULT_API_URL);
        let storage_dir = get_or_default(&lookup, "CATALOG_STORAGE_DIR", DEFAULT_STORAGE_DIR);

        if storage_dir.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_STORAGE_DIR".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            api_url: parse_api_url("CATALOG_API_URL", &api_url)?,
            storage_dir: PathBuf::from(storage_dir),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse and validate the product API base endpoint.
fn parse_api_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "URL cannot carry path segments".to_string(),
        ));
    }

    Ok(url)
}
