//! Capabilities the directory and login flow need from the backend.
//!
//! The view holds these as trait objects so tests can substitute doubles for
//! the HTTP client.

use async_trait::async_trait;
use usuarios_api::{Credentials, Scheme, UserDraft, UserId, UserRecord, UsuariosClient, Verification};
use usuarios_core::Result;

/// CRUD operations on the remote user list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Fetch every user.
    async fn list_users(&self) -> Result<Vec<UserRecord>>;
    /// Create a user; returns the stored record with its identifier.
    async fn create_user(&self, draft: &UserDraft) -> Result<UserRecord>;
    /// Replace a user; returns the stored record.
    async fn update_user(&self, record: &UserRecord) -> Result<UserRecord>;
    /// Delete a user.
    async fn delete_user(&self, id: UserId) -> Result<()>;
}

/// Per-scheme credential verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Ask the backend whether `credentials` match under `scheme`.
    async fn verify(&self, scheme: Scheme, credentials: &Credentials) -> Result<Verification>;
}

#[async_trait]
impl DirectoryApi for UsuariosClient {
    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        UsuariosClient::list_users(self).await
    }

    async fn create_user(&self, draft: &UserDraft) -> Result<UserRecord> {
        UsuariosClient::create_user(self, draft).await
    }

    async fn update_user(&self, record: &UserRecord) -> Result<UserRecord> {
        UsuariosClient::update_user(self, record).await
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        UsuariosClient::delete_user(self, id).await
    }
}

#[async_trait]
impl CredentialVerifier for UsuariosClient {
    async fn verify(&self, scheme: Scheme, credentials: &Credentials) -> Result<Verification> {
        self.verify_credentials(scheme, credentials).await
    }
}
