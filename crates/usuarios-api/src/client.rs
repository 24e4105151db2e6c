//! Asynchronous usuarios API client implementation.

use crate::models::{Credentials, Scheme, UserDraft, UserId, UserRecord, Verification};
use crate::Result;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use usuarios_core::client::{
    ClientConfig, RetryPolicy, ServiceClient, ServiceClientBuilder, USUARIOS_DEFAULT_TIMEOUT,
};
use usuarios_core::{ApiConfig, Error};
use url::Url;

const SERVICE: &str = "usuarios";
const USER_AGENT: &str = concat!("usuarios-api/", env!("CARGO_PKG_VERSION"));

/// Builder for [`UsuariosClient`].
#[derive(Debug, Clone)]
pub struct UsuariosClientBuilder {
    inner: ServiceClientBuilder,
}

impl UsuariosClientBuilder {
    /// Create a builder for the specified base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let builder = ServiceClientBuilder::new(
            SERVICE,
            base_url,
            Duration::from_secs(USUARIOS_DEFAULT_TIMEOUT),
        )?
        .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Create a builder from a validated [`ApiConfig`].
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(&config.base_url)?.with_http_config(config.client_config()))
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry_policy(retry);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<UsuariosClient> {
        let inner = self.inner.build()?;
        Ok(UsuariosClient { inner })
    }
}

/// Asynchronous client for the `/usuarios` endpoints.
#[derive(Debug, Clone)]
pub struct UsuariosClient {
    inner: ServiceClient,
}

impl UsuariosClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        UsuariosClientBuilder::new(base_url)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// List every user.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        self.send_json::<(), Vec<UserRecord>>(Method::GET, "usuarios", None)
            .await
    }

    /// Create a user; the response carries the assigned identifier.
    pub async fn create_user(&self, draft: &UserDraft) -> Result<UserRecord> {
        self.send_json(Method::POST, "usuarios", Some(draft)).await
    }

    /// Replace a user with the full record.
    pub async fn update_user(&self, record: &UserRecord) -> Result<UserRecord> {
        let path = format!("usuarios/{}", record.id);
        self.send_json(Method::PUT, &path, Some(record)).await
    }

    /// Delete a user by identifier.
    pub async fn delete_user(&self, id: UserId) -> Result<()> {
        let path = format!("usuarios/{id}");
        self.inner
            .execute_with_retry(
                Method::DELETE,
                &path,
                |request| request,
                map_status_to_error,
            )
            .await
            .map(|_| ())
    }

    /// Ask the backend to verify credentials against `scheme`.
    pub async fn verify_credentials(
        &self,
        scheme: Scheme,
        credentials: &Credentials,
    ) -> Result<Verification> {
        self.send_json(Method::POST, &scheme.verification_path(), Some(credentials))
            .await
    }

    async fn send_json<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .execute_with_retry(
                method,
                path,
                |mut request| {
                    request = request.header("Accept", "application/json");
                    if let Some(payload) = body {
                        request = request.json(payload);
                    }
                    request
                },
                map_status_to_error,
            )
            .await?;

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Error::from)
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::InvalidRequest(format!("usuarios API refused the request: {text}"))
        }
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("usuarios API temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::HttpError(format!("usuarios API server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("usuarios API error {status}: {text}")),
    }
}
