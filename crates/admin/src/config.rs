//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ADMIN_PORTAL_API_URL` - Base URL of the admin API
//!   (default: `https://acrid-street-production.up.railway.app/api/v2`)
//! - `ADMIN_PORTAL_DATA_DIR` - Directory holding the credential store
//!   (default: `<platform data dir>/admin-portal`)
//! - `ADMIN_PORTAL_STORE_SCOPE` - Namespace of the credential store (default: `admin-portal`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Production API base, including the version prefix.
pub const DEFAULT_API_URL: &str = "https://acrid-street-production.up.railway.app/api/v2";

const DEFAULT_STORE_SCOPE: &str = "admin-portal";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin portal client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is appended to
    pub api_url: Url,
    /// Directory holding the scoped credential store
    pub data_dir: PathBuf,
    /// Credential store scope (file stem inside `data_dir`)
    pub store_scope: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if no
    /// data directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(
            &lookup("ADMIN_PORTAL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;

        let data_dir = match lookup("ADMIN_PORTAL_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|dir| dir.join("admin-portal"))
                .ok_or_else(|| ConfigError::MissingEnvVar("ADMIN_PORTAL_DATA_DIR".to_string()))?,
        };

        let store_scope =
            lookup("ADMIN_PORTAL_STORE_SCOPE").unwrap_or_else(|| DEFAULT_STORE_SCOPE.to_string());
        validate_scope(&store_scope)?;

        let sentry_sample_rate = lookup("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            api_url,
            data_dir,
            store_scope,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
        })
    }

    /// Path of the credential store file.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.store_scope))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the API base URL, normalising it to end with a slash so relative
/// joins keep the `/api/v2` prefix.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|e| {
        ConfigError::InvalidEnvVar("ADMIN_PORTAL_API_URL".to_string(), e.to_string())
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "ADMIN_PORTAL_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// The scope becomes a file name, so keep it to a safe character set.
fn validate_scope(scope: &str) -> Result<(), ConfigError> {
    let valid = !scope.is_empty()
        && scope
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            "ADMIN_PORTAL_STORE_SCOPE".to_string(),
            "use letters, digits, '-' or '_'".to_string(),
        ))
    }
}
