use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use crate::error::{ApiResponse, AppError, Result};
use crate::models::{
    FileBlob, FileGetResponse, FileListResponse, FileQuery, UploadResponse,
};
use crate::services::{SyncError, SyncService, TokenStore};
use crate::AppState;

/// List Drive files, optionally filtered by a name search term
/// GET /api/v1/drive/files?search=...
///
/// Both "no token stored" and "provider call failed" collapse to
/// `authenticated: false` here; the distinction lives in `SyncError`
/// for callers that need it.
pub async fn list_files(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<FileQuery>,
) -> Json<ApiResponse<FileListResponse>> {
    let access_token = TokenStore::read(&jar);

    match SyncService::list_files(
        state.drive.as_ref(),
        access_token.as_deref(),
        query.search.as_deref(),
    )
    .await
    {
        Ok(files) => Json(ApiResponse::success(FileListResponse {
            files,
            authenticated: true,
        })),
        Err(err) => {
            if let SyncError::Remote(remote) = &err {
                tracing::warn!("Drive listing failed: {}", remote);
            }
            Json(ApiResponse::success(FileListResponse {
                files: Vec::new(),
                authenticated: false,
            }))
        }
    }
}

/// Fetch one Drive file
/// GET /api/v1/drive/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Json<ApiResponse<FileGetResponse>> {
    let access_token = TokenStore::read(&jar);

    match SyncService::get_file(state.drive.as_ref(), access_token.as_deref(), &id).await {
        Ok(file) => Json(ApiResponse::success(FileGetResponse {
            file,
            authenticated: true,
        })),
        Err(SyncError::Unauthenticated) => Json(ApiResponse::success(FileGetResponse {
            file: None,
            authenticated: false,
        })),
        Err(SyncError::Remote(err)) => {
            tracing::warn!("Drive fetch failed for {}: {}", id, err);
            Json(ApiResponse::success(FileGetResponse {
                file: None,
                authenticated: true,
            }))
        }
    }
}

/// Upload a file to Drive and share it publicly
/// POST /api/v1/drive/files/upload
///
/// Multipart fields: `file` (required), `for_class` (optional grade tag,
/// stored in the file description)
pub async fn upload_file(
    State(state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>> {
    let mut blob: Option<FileBlob> = None;
    let mut for_class: Option<String> = None;

    // Process multipart fields
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to process multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .unwrap_or("Unnamed File")
                    .to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file field: {}", e))
                })?;
                blob = Some(FileBlob::new(file_name, mime_type, bytes));
            }
            "for_class" => {
                let text = field.text().await.unwrap_or_default();
                if !text.is_empty() {
                    for_class = Some(text);
                }
            }
            _ => {}
        }
    }

    let blob = blob.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let access_token = TokenStore::read(&jar);
    match SyncService::upload_file(
        state.drive.as_ref(),
        access_token.as_deref(),
        blob,
        for_class.as_deref(),
    )
    .await
    {
        Ok(uploaded) => Ok(Json(ApiResponse::success(UploadResponse {
            file: Some(uploaded.file),
            success: true,
            shared_publicly: Some(uploaded.shared_publicly),
            error: None,
        }))),
        Err(SyncError::Unauthenticated) => Ok(Json(ApiResponse::success(UploadResponse {
            file: None,
            success: false,
            shared_publicly: None,
            error: Some("Not authenticated with Google Drive".to_string()),
        }))),
        Err(SyncError::Remote(err)) => {
            tracing::warn!("Drive upload failed: {}", err);
            Ok(Json(ApiResponse::success(UploadResponse {
                file: None,
                success: false,
                shared_publicly: None,
                error: Some("Failed to upload file".to_string()),
            })))
        }
    }
}
