//! HTTP client utilities and retry logic.
//!
//! This module provides the shared [`ServiceClient`] used by the API crates:
//! base URL resolution, timeouts, connection pooling and a retry policy for
//! transient failures.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};

/// Default timeout for usuarios API requests (seconds)
pub const USUARIOS_DEFAULT_TIMEOUT: u64 = 30;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

// Retry settings

/// Default maximum number of retry attempts when retries are enabled
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default initial retry delay in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Default maximum retry delay in milliseconds (for exponential backoff)
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 5000;

const DEFAULT_USER_AGENT: &str = concat!("usuarios-core/", env!("CARGO_PKG_VERSION"));

/// Retry policy with exponential backoff.
///
/// Only transient failures (see [`Error::is_transient`]) are retried. Requests
/// with a non-idempotent method are retried only when the connection could not
/// be established, since the server never saw them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial delay before first retry
    pub initial_delay: Duration,

    /// Maximum delay between retries (cap for exponential backoff)
    pub max_delay: Duration,

    /// Backoff multiplier (typically 2 for exponential backoff)
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Create a retry policy with the default backoff settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
            backoff_multiplier: 2,
        }
    }

    /// Create a retry policy with no retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1,
        }
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Calculate delay for a given attempt number.
    ///
    /// Uses exponential backoff: delay = min(initial_delay * multiplier^(attempt-1), max_delay)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let multiplier = self.backoff_multiplier.saturating_pow(attempt - 1);
        let delay_ms = u64::try_from(self.initial_delay.as_millis())
            .unwrap_or(u64::MAX)
            .saturating_mul(u64::from(multiplier));

        std::cmp::min(Duration::from_millis(delay_ms), self.max_delay)
    }

    /// Check if retries are enabled.
    #[must_use]
    pub const fn has_retries(&self) -> bool {
        self.max_retries > 0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Retry policy, disabled unless set explicitly
    pub retry_policy: RetryPolicy,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(USUARIOS_DEFAULT_TIMEOUT),
            retry_policy: RetryPolicy::no_retry(),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    service: &'static str,
    base_url: Url,
    user_agent: String,
    config: ClientConfig,
}

impl ServiceClientBuilder {
    /// Create a builder for `service` rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] when the URL cannot be parsed or is
    /// not an http(s) URL.
    pub fn new(service: &'static str, base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url.as_ref())?;
        Ok(Self {
            service,
            base_url,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            config: ClientConfig::new().with_timeout(timeout),
        })
    }

    /// Override the user agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.config.retry_policy = retry;
        self
    }

    /// Replace the HTTP client configuration, including its retry policy.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let http = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .pool_idle_timeout(self.config.pool_idle_timeout)
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host)
            .gzip(true)
            .user_agent(self.user_agent)
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to build HTTP client: {e}")))?;

        Ok(ServiceClient {
            service: self.service,
            base_url: self.base_url,
            http,
            config: self.config,
        })
    }
}

/// HTTP client bound to one service base URL.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    service: &'static str,
    base_url: Url,
    http: reqwest::Client,
    config: ClientConfig,
}

impl ServiceClient {
    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(Error::from)
    }

    /// Send a request, retrying transient failures per the retry policy.
    ///
    /// GET, PUT and DELETE are retried on any transient failure. Other
    /// methods are retried only after a connect error.
    ///
    /// `customize` decorates each attempt (headers, body). Non-2xx responses
    /// are turned into errors by `map_status`, which receives the status and
    /// the response body text.
    ///
    /// # Errors
    ///
    /// Returns the last error observed once retries are exhausted, or the
    /// first non-transient error.
    pub async fn execute_with_retry<F, M>(
        &self,
        method: Method,
        path: &str,
        customize: F,
        map_status: M,
    ) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
        M: Fn(StatusCode, String) -> Error,
    {
        let url = self.endpoint(path)?;
        let policy = self.config.retry_policy;
        let idempotent = method.is_idempotent();
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                tokio::time::sleep(policy.delay_for_attempt(attempt)).await;
            }

            let request = customize(self.http.request(method.clone(), url.clone()));
            debug!(service = self.service, %method, %url, attempt, "sending request");

            let (error, never_sent) = match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(
                        service = self.service,
                        status = response.status().as_u16(),
                        "request succeeded"
                    );
                    return Ok(response);
                }
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    (map_status(status, text), false)
                }
                Err(err) => {
                    let never_sent = err.is_connect();
                    (Error::from(err), never_sent)
                }
            };

            let retryable = error.is_transient() && (idempotent || never_sent);
            if retryable && attempt < policy.max_retries {
                attempt += 1;
                warn!(
                    service = self.service,
                    %method,
                    %url,
                    attempt,
                    error = %error,
                    "transient failure, retrying"
                );
                continue;
            }

            return Err(error);
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidEndpoint(format!(
            "unsupported scheme `{}` in {raw}",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
