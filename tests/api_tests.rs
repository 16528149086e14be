use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use bytes::Bytes;
use http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use classdrive::config::Config;
use classdrive::drive::{DriveError, RemoteDrive};
use classdrive::models::{FileBlob, RemoteFile, TokenPair};
use classdrive::{create_router, AppState};

const GOOD_CODE: &str = "good-code";

/// Counting mock adapter so tests can assert which provider calls
/// actually happened
#[derive(Default)]
struct MockDrive {
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

#[async_trait]
impl RemoteDrive for MockDrive {
    fn authorization_url(&self, redirect_uri: &str) -> String {
        format!("https://auth.example/consent?redirect_uri={}", redirect_uri)
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenPair, DriveError> {
        // The default config's redirect base plus the fixed suffix
        if redirect_uri != "http://localhost:3000/api/auth/callback/google" {
            return Err(DriveError::AuthExchange("redirect_uri mismatch".to_string()));
        }
        if code != GOOD_CODE {
            return Err(DriveError::AuthExchange("invalid grant".to_string()));
        }
        Ok(TokenPair {
            access_token: "access-token".to_string(),
            refresh_token: Some("refresh-token".to_string()),
        })
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenPair, DriveError> {
        if refresh_token != "refresh-token" {
            return Err(DriveError::TokenRefresh("invalid refresh token".to_string()));
        }
        Ok(TokenPair {
            access_token: "rotated-access".to_string(),
            refresh_token: None,
        })
    }

    async fn list(
        &self,
        _access_token: &str,
        _search_term: Option<&str>,
    ) -> Result<Vec<RemoteFile>, DriveError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![RemoteFile {
            id: "f1".to_string(),
            name: Some("Syllabus.pdf".to_string()),
            mime_type: Some("application/pdf".to_string()),
            size: Some("2516582".to_string()),
            created_time: Some("2023-09-15T08:30:00Z".to_string()),
            description: Some("Grade: 10".to_string()),
            ..RemoteFile::default()
        }])
    }

    async fn get(
        &self,
        _access_token: &str,
        file_id: &str,
    ) -> Result<Option<RemoteFile>, DriveError> {
        Ok(Some(RemoteFile {
            id: file_id.to_string(),
            name: Some("Notes.pdf".to_string()),
            mime_type: Some("application/pdf".to_string()),
            ..RemoteFile::default()
        }))
    }

    async fn create(
        &self,
        _access_token: &str,
        blob: &FileBlob,
        description: Option<&str>,
    ) -> Result<RemoteFile, DriveError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok(RemoteFile {
            id: "uploaded-1".to_string(),
            name: Some(blob.name.clone()),
            mime_type: Some(blob.mime_type.clone()),
            size: Some(blob.bytes.len().to_string()),
            description: description.map(|d| d.to_string()),
            ..RemoteFile::default()
        })
    }

    async fn grant_public_read(
        &self,
        _access_token: &str,
        _file_id: &str,
    ) -> Result<(), DriveError> {
        Ok(())
    }
}

fn setup() -> (axum::Router, Arc<MockDrive>) {
    let drive = Arc::new(MockDrive::default());
    let state = AppState {
        config: Arc::new(Config::default()),
        drive: drive.clone(),
    };
    (create_router(state), drive)
}

async fn body_to_bytes(body: Body) -> Bytes {
    body.collect().await.unwrap().to_bytes()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = body_to_bytes(body).await;
    serde_json::from_slice(&bytes).unwrap()
}

fn access_cookie() -> (http::HeaderName, http::HeaderValue) {
    (
        header::COOKIE,
        http::HeaderValue::from_static("google_access_token=access-token"),
    )
}

#[tokio::test]
async fn callback_without_code_is_bad_request() {
    let (app, _) = setup();

    let req = Request::builder()
        .uri("/api/auth/callback/google")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_to_bytes(resp.into_body()).await;
    assert_eq!(&body[..], b"No code provided");
}

#[tokio::test]
async fn callback_success_stores_tokens_and_redirects() {
    let (app, _) = setup();

    let req = Request::builder()
        .uri(format!("/api/auth/callback/google?code={}", GOOD_CODE))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/files");

    let cookies: Vec<_> = resp
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("google_access_token=access-token")));
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("google_refresh_token=refresh-token")));
}

#[tokio::test]
async fn callback_failure_redirects_with_error_flag() {
    let (app, _) = setup();

    let req = Request::builder()
        .uri("/api/auth/callback/google?code=bad-code")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/files?error=auth_failed"
    );
}

#[tokio::test]
async fn list_without_cookie_reports_unauthenticated_without_provider_call() {
    let (app, drive) = setup();

    let req = Request::builder()
        .uri("/api/v1/drive/files")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_to_json(resp.into_body()).await;
    assert_eq!(body["data"]["authenticated"], Value::Bool(false));
    assert_eq!(body["data"]["files"].as_array().unwrap().len(), 0);
    assert_eq!(drive.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn list_with_cookie_returns_normalized_files() {
    let (app, drive) = setup();

    let (key, val) = access_cookie();
    let req = Request::builder()
        .uri("/api/v1/drive/files")
        .header(key, val)
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_to_json(resp.into_body()).await;
    assert_eq!(body["data"]["authenticated"], Value::Bool(true));

    let files = body["data"]["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["uploaded_by"], "Google Drive");
    assert_eq!(files[0]["category"], "PDF");
    assert_eq!(files[0]["class_tag"], "Grade 10");
    assert_eq!(files[0]["size_label"], "2 MB");
    assert_eq!(drive.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn get_file_without_cookie_reports_unauthenticated() {
    let (app, _) = setup();

    let req = Request::builder()
        .uri("/api/v1/drive/files/f1")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_to_json(resp.into_body()).await;
    assert_eq!(body["data"]["authenticated"], Value::Bool(false));
    assert!(body["data"]["file"].is_null());
}

#[tokio::test]
async fn auth_url_is_exposed() {
    let (app, _) = setup();

    let req = Request::builder()
        .uri("/api/v1/drive/auth-url")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_to_json(resp.into_body()).await;
    let url = body["data"]["url"].as_str().unwrap();
    assert!(url.starts_with("https://auth.example/consent"));
    assert!(url.contains("api%2Fauth%2Fcallback%2Fgoogle") || url.contains("api/auth/callback/google"));
}

#[tokio::test]
async fn disconnect_is_idempotent_over_http() {
    let (app, _) = setup();

    for _ in 0..2 {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/drive/disconnect")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_to_json(resp.into_body()).await;
        assert_eq!(body["code"], 0);
    }
}

#[tokio::test]
async fn refresh_without_cookie_is_unauthorized() {
    let (app, _) = setup();

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/drive/refresh")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_with_cookie_rotates_access_token() {
    let (app, _) = setup();

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/drive/refresh")
        .header(
            header::COOKIE,
            http::HeaderValue::from_static("google_refresh_token=refresh-token"),
        )
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let cookies: Vec<_> = resp
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("google_access_token=rotated-access")));
    // No new refresh token in the rotation response
    assert!(!cookies
        .iter()
        .any(|c| c.starts_with("google_refresh_token=")));
}

fn multipart_body(boundary: &str, include_file: bool) -> Vec<u8> {
    let mut body = Vec::new();
    if include_file {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"Notes.pdf\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
        body.extend_from_slice(b"pdf bytes");
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"for_class\"\r\n\r\n");
    body.extend_from_slice(b"9");
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

#[tokio::test]
async fn upload_without_token_reports_failure_without_provider_call() {
    let (app, drive) = setup();

    let boundary = "test_boundary";
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/drive/files/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(multipart_body(boundary, true)))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_to_json(resp.into_body()).await;
    assert_eq!(body["data"]["success"], Value::Bool(false));
    assert_eq!(
        body["data"]["error"],
        "Not authenticated with Google Drive"
    );
    assert_eq!(drive.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn upload_without_file_field_is_bad_request() {
    let (app, _) = setup();

    let boundary = "test_boundary";
    let (key, val) = access_cookie();
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/drive/files/upload")
        .header(key, val)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(multipart_body(boundary, false)))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_round_trip_tags_file_as_uploaded_by_you() {
    let (app, drive) = setup();

    let boundary = "test_boundary";
    let (key, val) = access_cookie();
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/drive/files/upload")
        .header(key, val)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(multipart_body(boundary, true)))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_to_json(resp.into_body()).await;
    assert_eq!(body["data"]["success"], Value::Bool(true));
    assert_eq!(body["data"]["shared_publicly"], Value::Bool(true));
    assert_eq!(body["data"]["file"]["uploaded_by"], "You");
    assert_eq!(body["data"]["file"]["name"], "Notes.pdf");
    assert_eq!(body["data"]["file"]["class_tag"], "Grade 9");
    assert_eq!(drive.create_calls.load(Ordering::SeqCst), 1);
}
