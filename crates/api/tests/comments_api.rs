//! HTTP-level tests for comment submission and moderation.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, create_post, delete_auth, get, get_auth, post_json, put_json_auth,
};

async fn submit_comment(app: &axum::Router, post_id: &serde_json::Value, content: &str) -> i64 {
    let response = post_json(
        app.clone(),
        &format!("/api/blog-posts/{post_id}/comments"),
        serde_json::json!({
            "author_name": "Reader",
            "author_email": "reader@example.com",
            "content": content,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    json["data"]["id"].as_i64().unwrap()
}

async fn public_comment_count(app: &axum::Router, post_id: &serde_json::Value) -> usize {
    let uri = format!("/api/blog-posts/{post_id}/comments");
    let json = body_json(get(app.clone(), &uri).await).await;
    json["data"].as_array().unwrap().len()
}

#[tokio::test]
async fn test_comment_visible_only_after_approval() {
    let app = common::build_test_app();
    let post = create_post(&app, "Discuss", "2024-04-04", true).await;
    let comment_id = submit_comment(&app, &post["id"], "First!").await;
    let token = admin_token();

    assert_eq!(public_comment_count(&app, &post["id"]).await, 0);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/comments/{comment_id}/status"),
        serde_json::json!({ "status": "approved" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(public_comment_count(&app, &post["id"]).await, 1);

    let post_uri = format!("/api/blog-posts/{}", post["id"]);
    let fetched = body_json(get(app.clone(), &post_uri).await).await;
    assert_eq!(fetched["data"]["comment_count"], 1);

    put_json_auth(
        app.clone(),
        &format!("/api/comments/{comment_id}/status"),
        serde_json::json!({ "status": "rejected" }),
        &token,
    )
    .await;
    assert_eq!(public_comment_count(&app, &post["id"]).await, 0);
}

#[tokio::test]
async fn test_moderation_queue_filters_by_status() {
    let app = common::build_test_app();
    let post = create_post(&app, "Discuss", "2024-04-04", true).await;
    let first = submit_comment(&app, &post["id"], "One").await;
    submit_comment(&app, &post["id"], "Two").await;
    let token = admin_token();

    put_json_auth(
        app.clone(),
        &format!("/api/comments/{first}/status"),
        serde_json::json!({ "status": "approved" }),
        &token,
    )
    .await;

    let response = get_auth(app.clone(), "/api/comments?status=pending", &token).await;
    let pending = body_json(response).await;
    assert_eq!(pending["data"].as_array().unwrap().len(), 1);

    let all = body_json(get_auth(app.clone(), "/api/comments", &token).await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let response = get_auth(app, "/api/comments?status=spam", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_comment() {
    let app = common::build_test_app();
    let post = create_post(&app, "Discuss", "2024-04-04", true).await;
    let comment_id = submit_comment(&app, &post["id"], "Bye").await;
    let token = admin_token();
    let uri = format!("/api/comments/{comment_id}");

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cannot_comment_on_draft() {
    let app = common::build_test_app();
    let draft = create_post(&app, "Draft", "2024-04-04", false).await;

    let response = post_json(
        app,
        &format!("/api/blog-posts/{}/comments", draft["id"]),
        serde_json::json!({ "author_name": "Reader", "content": "Early" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let app = common::build_test_app();
    let post = create_post(&app, "Discuss", "2024-04-04", true).await;

    let response = post_json(
        app,
        &format!("/api/blog-posts/{}/comments", post["id"]),
        serde_json::json!({ "author_name": "Reader", "author_email": "nope", "content": "Hi" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
