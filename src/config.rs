//! Client configuration.
//!
//! The backend is reached either directly during local development or
//! through a reverse proxy that mounts it under `/api` in deployments.

use std::time::Duration;

/// Backend address used in local development.
pub const LOCAL_BASE_URL: &str = "http://localhost:8000";

/// Path prefix the reverse proxy mounts the backend under.
pub const PROXY_PATH: &str = "/api";

/// Origin used for proxied mode when none is configured.
pub const DEFAULT_ORIGIN: &str = "http://localhost";

/// How the backend is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeployMode {
    /// Talk to the backend directly on localhost:8000
    #[default]
    Local,
    /// Go through the reverse proxy at `{origin}/api`
    Proxied,
}

impl DeployMode {
    /// Parse a mode name. Accepts `local`/`dev` and `proxied`/`production`/`prod`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" | "dev" | "development" => Some(DeployMode::Local),
            "proxied" | "proxy" | "production" | "prod" => Some(DeployMode::Proxied),
            _ => None,
        }
    }
}

/// Configuration for [`crate::api::ApiClient`].
///
/// # Example
///
/// ```
/// use ragchat::config::{ApiConfig, DeployMode};
///
/// let config = ApiConfig::default()
///     .with_mode(DeployMode::Proxied)
///     .with_origin("https://chat.example.com");
/// assert_eq!(config.base_url(), "https://chat.example.com/api");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiConfig {
    /// Deploy mode selecting the base URL
    pub mode: DeployMode,
    /// Origin for proxied mode (default: http://localhost)
    pub origin: Option<String>,
    /// Explicit base URL, overriding the mode
    pub base_url_override: Option<String>,
    /// Whole-request timeout; none means wait indefinitely
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    /// Create a new ApiConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deploy mode.
    pub fn with_mode(mut self, mode: DeployMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the proxy origin.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Use an explicit base URL regardless of mode.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url_override = Some(url.into());
        self
    }

    /// Set a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolved base URL, without a trailing slash.
    pub fn base_url(&self) -> String {
        let url = match (&self.base_url_override, self.mode) {
            (Some(url), _) => url.clone(),
            (None, DeployMode::Local) => LOCAL_BASE_URL.to_string(),
            (None, DeployMode::Proxied) => {
                let origin = self.origin.as_deref().unwrap_or(DEFAULT_ORIGIN);
                format!("{}{}", origin.trim_end_matches('/'), PROXY_PATH)
            }
        };
        url.trim_end_matches('/').to_string()
    }

    /// Build configuration from environment variables.
    ///
    /// - `RAGCHAT_API_URL` - explicit base URL
    /// - `RAGCHAT_MODE` - `local` (default) or `proxied`
    /// - `RAGCHAT_ORIGIN` - origin for proxied mode
    /// - `RAGCHAT_TIMEOUT_SECS` - request timeout in seconds
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(mode) = std::env::var("RAGCHAT_MODE") {
            match DeployMode::parse(&mode) {
                Some(mode) => config.mode = mode,
                None => tracing::warn!("Ignoring unknown RAGCHAT_MODE: {}", mode),
            }
        }

        if let Ok(origin) = std::env::var("RAGCHAT_ORIGIN") {
            config.origin = Some(origin);
        }

        if let Ok(url) = std::env::var("RAGCHAT_API_URL") {
            if !url.trim().is_empty() {
                config.base_url_override = Some(url);
            }
        }

        if let Ok(secs) = std::env::var("RAGCHAT_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Some(Duration::from_secs(secs)),
                _ => tracing::warn!("Ignoring invalid RAGCHAT_TIMEOUT_SECS: {}", secs),
            }
        }

        config
    }
}
