use crate::config::Config;
use crate::drive::{DriveError, RemoteDrive};
use crate::models::{FileBlob, FileOrigin, NormalizedFile, TokenPair, UploadedFile};
use crate::services::normalize::normalize;

/// Façade-level failure. Keeps "no token at all" distinct from "the
/// provider call failed" so callers can tell the two apart even though
/// the HTTP layer currently collapses both into `authenticated: false`.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Not authenticated with Google Drive")]
    Unauthenticated,

    #[error(transparent)]
    Remote(#[from] DriveError),
}

/// Drive synchronization façade
///
/// The single entry point the HTTP layer uses. Tokens are passed in
/// explicitly; the façade never reads cookies or any other ambient
/// state, and never panics on adapter failures.
pub struct SyncService;

impl SyncService {
    /// Provider consent URL for the configured redirect base
    pub fn authorization_url(drive: &dyn RemoteDrive, config: &Config) -> String {
        drive.authorization_url(&config.google.redirect_uri())
    }

    /// Exchange an authorization code for a token pair. The redirect
    /// URI is rebuilt from config so it matches the consent URL exactly.
    pub async fn complete_authorization(
        drive: &dyn RemoteDrive,
        config: &Config,
        code: &str,
    ) -> Result<TokenPair, DriveError> {
        drive
            .exchange_code(code, &config.google.redirect_uri())
            .await
    }

    /// List files, normalized with origin "listed". An absent access
    /// token short-circuits before the adapter is touched.
    pub async fn list_files(
        drive: &dyn RemoteDrive,
        access_token: Option<&str>,
        search_term: Option<&str>,
    ) -> Result<Vec<NormalizedFile>, SyncError> {
        let token = access_token.ok_or(SyncError::Unauthenticated)?;
        let files = drive.list(token, search_term).await?;
        Ok(files
            .into_iter()
            .map(|file| normalize(file, FileOrigin::Listed))
            .collect())
    }

    /// Fetch one file by id. `Ok(None)` when the provider has no such
    /// file.
    pub async fn get_file(
        drive: &dyn RemoteDrive,
        access_token: Option<&str>,
        file_id: &str,
    ) -> Result<Option<NormalizedFile>, SyncError> {
        let token = access_token.ok_or(SyncError::Unauthenticated)?;
        let file = drive.get(token, file_id).await?;
        Ok(file.map(|file| normalize(file, FileOrigin::Listed)))
    }

    /// Two-phase upload: create the remote file, then grant public
    /// read. A failed grant leaves the file in place and is reported
    /// through `shared_publicly: false` rather than rolled back.
    pub async fn upload_file(
        drive: &dyn RemoteDrive,
        access_token: Option<&str>,
        blob: FileBlob,
        class_tag: Option<&str>,
    ) -> Result<UploadedFile, SyncError> {
        let token = access_token.ok_or(SyncError::Unauthenticated)?;

        let description = class_tag
            .filter(|tag| !tag.trim().is_empty())
            .map(|tag| format!("Grade: {}", tag));

        let created = drive.create(token, &blob, description.as_deref()).await?;

        let shared_publicly = match drive.grant_public_read(token, &created.id).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("Public share grant failed for file {}: {}", created.id, err);
                false
            }
        };

        Ok(UploadedFile {
            file: normalize(created, FileOrigin::Uploaded),
            shared_publicly,
        })
    }

    /// Explicit token refresh. Nothing in this service calls it
    /// implicitly; whether expired sessions refresh silently or
    /// re-consent is the integrator's decision.
    pub async fn refresh_session(
        drive: &dyn RemoteDrive,
        refresh_token: Option<&str>,
    ) -> Result<TokenPair, SyncError> {
        let token = refresh_token.ok_or(SyncError::Unauthenticated)?;
        Ok(drive.refresh_access_token(token).await?)
    }
}
