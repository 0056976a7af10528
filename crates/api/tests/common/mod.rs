#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use servdesk_api::auth::jwt::{issue_access_token, JwtConfig};
use servdesk_api::config::ServerConfig;
use servdesk_api::media::MediaStore;
use servdesk_api::router::build_app_router;
use servdesk_api::state::AppState;
use servdesk_core::types::DbId;
use servdesk_db::models::user::CreateUser;
use servdesk_db::Store;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "servdesk-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(media_root: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 8 * 1024 * 1024,
        media_root: media_root.to_path_buf(),
        database_url: None,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        staff_bootstrap: None,
    }
}

/// The full application on an in-memory store, with media written to a
/// temporary directory that lives as long as this value.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub media_dir: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router with all middleware layers, exactly as
/// `main.rs` does.
pub fn build_test_app() -> TestApp {
    let media_dir = tempfile::tempdir().expect("tempdir should be created");
    let config = test_config(media_dir.path());

    let state = AppState {
        store: Store::in_memory(),
        config: Arc::new(config.clone()),
        media: Arc::new(MediaStore::new(media_dir.path())),
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        media_dir,
    }
}

/// Create a user directly in the store and return its id and a valid token.
pub async fn create_user(state: &AppState, username: &str, is_employee: bool) -> (DbId, String) {
    let account = state
        .store
        .create_user_with_profile(&CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            full_name: "Test User".to_string(),
            password_hash: "not-used-by-token-auth".to_string(),
            is_employee,
        })
        .await
        .expect("user creation should succeed");

    let issued =
        issue_access_token(&account, &state.config.jwt).expect("token generation should succeed");
    (account.user.id, issued.token)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    json: serde_json::Value,
) -> Response {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(json.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::post(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, Vec<u8>),
}

pub fn multipart_body(parts: Vec<Part<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    token: &str,
    parts: Vec<Part<'_>>,
) -> Response {
    let request = Request::post(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and the `code` of an error body.
pub async fn assert_error(response: Response, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code, "unexpected error body: {json}");
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A small valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 3, image::Rgb([200, 40, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("png encoding should succeed");
    out.into_inner()
}

/// Submit an application through the API and return its id.
pub async fn submit_application(app: Router, token: &str, title: &str) -> DbId {
    let response = post_multipart_auth(
        app,
        "/application/create",
        token,
        vec![
            Part::Text("title", title),
            Part::Text("description", "Please fix it"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_i64()
        .expect("created application must have an id")
}
