#![allow(dead_code)]

use std::sync::{Arc, LazyLock};

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use quill_api::auth::jwt::{issue_access_token, JwtConfig};
use quill_api::auth::password::hash_password;
use quill_api::auth::AdminCredentials;
use quill_api::config::{ServerConfig, StoreBackend, StoreConfig};
use quill_api::router::build_app_router;
use quill_api::state::AppState;
use quill_db::{ContentStore, MemoryStore};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "test-admin-password";

/// Hashing is slow, so every test shares one hash.
static ADMIN_PASSWORD_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password(ADMIN_PASSWORD).expect("hashing should succeed"));

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        store: StoreConfig {
            backend: StoreBackend::Memory,
            database_url: None,
            max_connections: 5,
            seed_data_path: None,
        },
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        admin: AdminCredentials {
            username: ADMIN_USERNAME.to_string(),
            password_hash: ADMIN_PASSWORD_HASH.clone(),
        },
    }
}

/// Full application router over an empty in-memory store.
pub fn build_test_app() -> Router {
    build_test_app_with_store(Arc::new(MemoryStore::new()))
}

/// Full application router over the given store, with the same middleware
/// stack production uses.
pub fn build_test_app_with_store(store: Arc<dyn ContentStore>) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A valid admin bearer token for [`test_config`].
pub fn admin_token() -> String {
    issue_access_token(ADMIN_USERNAME, "admin", &test_config().jwt)
        .expect("token generation should succeed")
        .token
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, None, Some(token)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, None, Some(token)).await
}

/// Collect the response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn book_body(id: &str, title: &str, book_number: i32) -> Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "book_number": book_number,
        "series": "The Long Road",
        "themes": ["home", "memory"],
    })
}

pub fn post_body(title: &str, date: &str, published: bool) -> Value {
    serde_json::json!({
        "title": title,
        "content": format!("Body of {title}"),
        "date": date,
        "published": published,
    })
}

/// Create a book through the API and return its JSON representation.
pub async fn create_book(app: &Router, id: &str, title: &str, book_number: i32) -> Value {
    let response = post_json_auth(
        app.clone(),
        "/api/books",
        book_body(id, title, book_number),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Create a blog post through the API and return its JSON representation.
pub async fn create_post(app: &Router, title: &str, date: &str, published: bool) -> Value {
    let response = post_json_auth(
        app.clone(),
        "/api/blog-posts",
        post_body(title, date, published),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
