//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CARTKIT_API_URL` - Backend base URL (default: `http://127.0.0.1:5000`)
//! - `CARTKIT_STORAGE_PATH` - File backing the cart store (default: `.cartkit/storage.json`)
//! - `CARTKIT_STORAGE_KEY` - Key the cart is persisted under (default: `shoppingCart`)
//! - `CARTKIT_LOGIN_PATH` - Login entry point for auth redirects (default: `/login`)
//! - `CARTKIT_SESSION_COOKIE` - Cookie header forwarded to the backend for signed-in calls
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_STORAGE_PATH: &str = ".cartkit/storage.json";
/// Storage key the cart has always been persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "shoppingCart";
const DEFAULT_LOGIN_PATH: &str = "/login";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
///
/// Implements `Debug` manually to redact the session cookie.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Backend base URL; API paths are resolved against it
    pub api_url: Url,
    /// File holding the persisted key-value store
    pub storage_path: PathBuf,
    /// Key the cart is stored under
    pub storage_key: String,
    /// Path of the login page used for auth redirects
    pub login_path: String,
    /// Cookie header value sent with API requests
    pub session_cookie: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_url", &self.api_url.as_str())
            .field("storage_path", &self.storage_path)
            .field("storage_key", &self.storage_key)
            .field("login_path", &self.login_path)
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_url =
            parse_base_url("CARTKIT_API_URL", &get_or("CARTKIT_API_URL", DEFAULT_API_URL))?;
        let storage_path = PathBuf::from(get_or("CARTKIT_STORAGE_PATH", DEFAULT_STORAGE_PATH));

        let storage_key = get_or("CARTKIT_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CARTKIT_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let login_path = get_or("CARTKIT_LOGIN_PATH", DEFAULT_LOGIN_PATH);
        if !login_path.starts_with('/') {
            return Err(ConfigError::InvalidEnvVar(
                "CARTKIT_LOGIN_PATH".to_string(),
                format!("must be an absolute path (got {login_path:?})"),
            ));
        }

        Ok(Self {
            api_url,
            storage_path,
            storage_key,
            login_path,
            session_cookie: lookup("CARTKIT_SESSION_COOKIE")
                .filter(|v| !v.is_empty())
                .map(SecretString::from),
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a base URL, rejecting anything that cannot carry an `/api/...` path.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected an http(s) base URL (got {value:?})"),
        ));
    }
    Ok(url)
}
