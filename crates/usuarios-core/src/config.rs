//! Configuration for usuarios API clients.
//!
//! [`ApiConfig`] carries the base URL, timeout and retry budget. It can be
//! built in code, deserialized, or read from `USUARIOS_*` environment
//! variables, and is validated before use.

use crate::client::{ClientConfig, RetryPolicy};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

/// Environment variable holding the API base URL.
pub const ENV_BASE_URL: &str = "USUARIOS_API_URL";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "USUARIOS_TIMEOUT_SECS";
/// Environment variable holding the maximum retry count.
pub const ENV_MAX_RETRIES: &str = "USUARIOS_MAX_RETRIES";

/// Configuration for a usuarios API client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    /// API base URL
    #[validate(url)]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of retry attempts for transient failures
    #[validate(range(min = 0, max = 10))]
    #[serde(default)]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl ApiConfig {
    /// Create a configuration for `base_url` with default timeout and no retries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if validation fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            base_url: base_url.into(),
            ..Self::default()
        };
        config.validated()
    }

    /// Build a configuration from `USUARIOS_*` environment variables, falling
    /// back to defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if a variable does not parse or the
    /// resulting configuration is invalid.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout_secs = raw.trim().parse().map_err(|e| {
                Error::ConfigError(format!("{ENV_TIMEOUT_SECS}={raw:?} is not a number: {e}"))
            })?;
        }
        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            config.max_retries = raw.trim().parse().map_err(|e| {
                Error::ConfigError(format!("{ENV_MAX_RETRIES}={raw:?} is not a number: {e}"))
            })?;
        }

        config.validated()
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Derive the HTTP client configuration.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let retry = if self.max_retries == 0 {
            RetryPolicy::no_retry()
        } else {
            RetryPolicy::new().with_max_retries(self.max_retries)
        };
        ClientConfig::new()
            .with_timeout(self.timeout())
            .with_retry_policy(retry)
    }

    /// Validate, returning the configuration on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the failed constraints.
    pub fn validated(self) -> Result<Self, Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        Ok(self)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: 0,
        }
    }
}
