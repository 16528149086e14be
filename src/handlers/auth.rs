use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::error::{ApiResponse, AppError, Result};
use crate::models::AuthUrlResponse;
use crate::services::{SyncService, TokenStore};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// Build the provider consent URL
/// GET /api/v1/drive/auth-url
pub async fn auth_url(State(state): State<AppState>) -> Json<ApiResponse<AuthUrlResponse>> {
    let url = SyncService::authorization_url(state.drive.as_ref(), &state.config);
    Json(ApiResponse::success(AuthUrlResponse { url }))
}

/// OAuth redirect callback
/// GET /api/auth/callback/google?code=...
///
/// The path must match the redirect URI registered with the provider.
/// Success stores the token pair and redirects to the files view;
/// failure redirects with an error flag instead of surfacing the
/// provider message.
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let code = match query.code {
        Some(code) => code,
        None => return (StatusCode::BAD_REQUEST, "No code provided").into_response(),
    };

    match SyncService::complete_authorization(state.drive.as_ref(), &state.config, &code).await {
        Ok(tokens) => {
            let jar = TokenStore::save(jar, &tokens, &state.config.auth);
            (jar, Redirect::to("/files")).into_response()
        }
        Err(err) => {
            tracing::warn!("Google authorization failed: {}", err);
            Redirect::to("/files?error=auth_failed").into_response()
        }
    }
}

/// Refresh the access token from the stored refresh token
/// POST /api/v1/drive/refresh
///
/// Explicit by design: expired access tokens are never refreshed
/// silently on list/get/upload.
pub async fn refresh_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let refresh_token = TokenStore::read_refresh(&jar)
        .ok_or_else(|| AppError::Unauthorized("Missing refresh token".to_string()))?;

    match SyncService::refresh_session(state.drive.as_ref(), Some(refresh_token.as_str())).await {
        Ok(tokens) => {
            let jar = TokenStore::save(jar, &tokens, &state.config.auth);
            Ok((
                jar,
                Json(ApiResponse::<()>::success_message("Access token refreshed")),
            ))
        }
        Err(err) => {
            tracing::warn!("Token refresh failed: {}", err);
            Err(AppError::Unauthorized("Token refresh failed".to_string()))
        }
    }
}

/// Drop both tokens
/// POST /api/v1/drive/disconnect
pub async fn disconnect(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = TokenStore::clear(jar, &state.config.auth);
    (
        jar,
        Json(ApiResponse::<()>::success_message(
            "Disconnected from Google Drive",
        )),
    )
}
