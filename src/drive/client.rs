use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use crate::config::GoogleConfig;
use crate::drive::{DriveError, RemoteDrive};
use crate::models::{FileBlob, RemoteFile, TokenPair};

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const UPLOAD_API_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
const OAUTH_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Full Drive access, as the portal needs to both read and create files
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

const PAGE_SIZE: u32 = 50;

/// Field set requested on every file-bearing call
const FILE_FIELDS: &str =
    "id, name, mimeType, size, createdTime, description, webViewLink, webContentLink, iconLink, thumbnailLink";

/// OAuth token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// File list endpoint response
#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<RemoteFile>,
}

/// Google Drive client over the v3 REST API
#[derive(Debug, Clone)]
pub struct GoogleDrive {
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
}

impl GoogleDrive {
    pub fn new(config: &GoogleConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            http,
        })
    }

    /// Read the response body for an error message, falling back to the
    /// status code alone
    async fn error_body(resp: reqwest::Response) -> String {
        let status = resp.status();
        match resp.text().await {
            Ok(text) if !text.is_empty() => format!("HTTP {}: {}", status, text),
            _ => format!("HTTP {}", status),
        }
    }
}

#[async_trait]
impl RemoteDrive for GoogleDrive {
    fn authorization_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            OAUTH_AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(DRIVE_SCOPE),
        )
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenPair, DriveError> {
        let resp = self
            .http
            .post(OAUTH_TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| DriveError::AuthExchange(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DriveError::AuthExchange(Self::error_body(resp).await));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| DriveError::AuthExchange(e.to_string()))?;

        Ok(TokenPair {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        })
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenPair, DriveError> {
        let resp = self
            .http
            .post(OAUTH_TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| DriveError::TokenRefresh(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DriveError::TokenRefresh(Self::error_body(resp).await));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| DriveError::TokenRefresh(e.to_string()))?;

        Ok(TokenPair {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        })
    }

    async fn list(
        &self,
        access_token: &str,
        search_term: Option<&str>,
    ) -> Result<Vec<RemoteFile>, DriveError> {
        let mut query = String::from("trashed = false");
        if let Some(term) = search_term {
            query.push_str(&format!(
                " and name contains '{}'",
                term.replace('\'', "\\'")
            ));
        }

        let url = format!(
            "{}/files?q={}&pageSize={}&fields={}",
            DRIVE_API_BASE,
            urlencoding::encode(&query),
            PAGE_SIZE,
            urlencoding::encode(&format!("files({})", FILE_FIELDS)),
        );

        let resp = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| DriveError::RemoteList(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DriveError::RemoteList(Self::error_body(resp).await));
        }

        let list: DriveFileList = resp
            .json()
            .await
            .map_err(|e| DriveError::RemoteList(e.to_string()))?;

        Ok(list.files)
    }

    async fn get(
        &self,
        access_token: &str,
        file_id: &str,
    ) -> Result<Option<RemoteFile>, DriveError> {
        let url = format!(
            "{}/files/{}?fields={}",
            DRIVE_API_BASE,
            urlencoding::encode(file_id),
            urlencoding::encode(FILE_FIELDS),
        );

        let resp = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| DriveError::RemoteGet(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(DriveError::RemoteGet(Self::error_body(resp).await));
        }

        let file: RemoteFile = resp
            .json()
            .await
            .map_err(|e| DriveError::RemoteGet(e.to_string()))?;

        Ok(Some(file))
    }

    async fn create(
        &self,
        access_token: &str,
        blob: &FileBlob,
        description: Option<&str>,
    ) -> Result<RemoteFile, DriveError> {
        let metadata = match description {
            Some(desc) => serde_json::json!({ "name": blob.name, "description": desc }),
            None => serde_json::json!({ "name": blob.name }),
        };

        // multipart/related body: JSON metadata part, then the media part
        let boundary = format!("classdrive_{}", Uuid::new_v4().simple());
        let mut body = Vec::with_capacity(blob.bytes.len() + 512);
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
        body.extend_from_slice(metadata.to_string().as_bytes());
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", blob.mime_type).as_bytes());
        body.extend_from_slice(&blob.bytes);
        body.extend_from_slice(format!("\r\n--{}--", boundary).as_bytes());

        let url = format!(
            "{}/files?uploadType=multipart&fields={}",
            UPLOAD_API_BASE,
            urlencoding::encode(FILE_FIELDS),
        );

        let resp = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| DriveError::RemoteUpload(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DriveError::RemoteUpload(Self::error_body(resp).await));
        }

        resp.json()
            .await
            .map_err(|e| DriveError::RemoteUpload(e.to_string()))
    }

    async fn grant_public_read(
        &self,
        access_token: &str,
        file_id: &str,
    ) -> Result<(), DriveError> {
        let url = format!(
            "{}/files/{}/permissions",
            DRIVE_API_BASE,
            urlencoding::encode(file_id),
        );

        let resp = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await
            .map_err(|e| DriveError::PermissionGrant(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DriveError::PermissionGrant(Self::error_body(resp).await));
        }

        Ok(())
    }
}
