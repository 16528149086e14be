pub mod client;

pub use client::GoogleDrive;

use async_trait::async_trait;

use crate::models::{FileBlob, RemoteFile, TokenPair};

/// Adapter-level error taxonomy. Each variant carries the provider or
/// transport message; callers above the sync façade never see these raw.
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error("Authorization exchange failed: {0}")]
    AuthExchange(String),

    #[error("File listing failed: {0}")]
    RemoteList(String),

    #[error("File fetch failed: {0}")]
    RemoteGet(String),

    #[error("File upload failed: {0}")]
    RemoteUpload(String),

    #[error("Permission grant failed: {0}")]
    PermissionGrant(String),

    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),
}

/// Remote drive adapter trait.
///
/// Owns no token state: the access token is supplied per call by the
/// sync façade. `create` and `grant_public_read` are separate primitives
/// because the provider does not apply them atomically.
#[async_trait]
pub trait RemoteDrive: Send + Sync {
    /// Build the provider consent URL for the given redirect URI.
    /// Requests offline access (so a refresh token is issued) and
    /// forced re-consent.
    fn authorization_url(&self, redirect_uri: &str) -> String;

    /// One-shot code-for-token exchange. The redirect URI must match
    /// the one the consent URL was built with byte for byte, or the
    /// provider rejects the exchange.
    async fn exchange_code(&self, code: &str, redirect_uri: &str)
        -> Result<TokenPair, DriveError>;

    /// Obtain a new access token from a refresh token. The response
    /// usually carries no new refresh token.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenPair, DriveError>;

    /// List non-trashed files, optionally filtered by name substring
    /// at the provider. Fixed page size.
    async fn list(
        &self,
        access_token: &str,
        search_term: Option<&str>,
    ) -> Result<Vec<RemoteFile>, DriveError>;

    /// Fetch one file by id. `Ok(None)` when the provider reports it
    /// does not exist.
    async fn get(&self, access_token: &str, file_id: &str)
        -> Result<Option<RemoteFile>, DriveError>;

    /// Create a new remote file from the blob's bytes and MIME type.
    async fn create(
        &self,
        access_token: &str,
        blob: &FileBlob,
        description: Option<&str>,
    ) -> Result<RemoteFile, DriveError>;

    /// Grant "anyone with the link" read access to a file.
    async fn grant_public_read(&self, access_token: &str, file_id: &str)
        -> Result<(), DriveError>;
}
