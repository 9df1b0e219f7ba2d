//! HTTP-level tests for the edit history ledger and undo.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, create_book, create_post, delete_auth, get, get_auth, post_auth,
    post_json, post_json_auth, put_json_auth, send,
};
use serde_json::{json, Value};

async fn record_history(app: &axum::Router, table: &str, record_id: &str) -> Vec<Value> {
    let response = get_auth(
        app.clone(),
        &format!("/api/history/{table}/{record_id}"),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].as_array().unwrap().clone()
}

async fn undo(app: &axum::Router, table: &str, record_id: &str) -> bool {
    let response = post_auth(
        app.clone(),
        &format!("/api/history/{table}/{record_id}/undo"),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["success"].as_bool().unwrap()
}

/// Every entry carries exactly the snapshots its action calls for.
fn assert_snapshot_invariant(entries: &[Value]) {
    for entry in entries {
        let has_old = !entry["old_data"].is_null();
        let has_new = !entry["new_data"].is_null();
        match entry["action"].as_str().unwrap() {
            "create" => assert!(!has_old && has_new, "bad create entry: {entry}"),
            "update" => assert!(has_old && has_new, "bad update entry: {entry}"),
            "delete" => assert!(has_old && !has_new, "bad delete entry: {entry}"),
            other => panic!("unexpected action {other}"),
        }
    }
}

#[tokio::test]
async fn test_mutations_are_recorded_newest_first() {
    let app = common::build_test_app();
    let token = admin_token();
    create_book(&app, "b1", "First", 1).await;
    put_json_auth(
        app.clone(),
        "/api/books/b1",
        serde_json::json!({ "title": "Second" }),
        &token,
    )
    .await;
    delete_auth(app.clone(), "/api/books/b1", &token).await;

    let entries = record_history(&app, "books", "b1").await;
    let actions: Vec<&str> = entries
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["delete", "update", "create"]);
    assert_eq!(entries[1]["old_data"]["title"], "First");
    assert_eq!(entries[1]["new_data"]["title"], "Second");
    assert_snapshot_invariant(&entries);
}

/// A record's JSON without its timestamps, which an undo is free to move.
fn content_of(record: &Value) -> Value {
    let mut record = record.clone();
    let fields = record.as_object_mut().unwrap();
    fields.remove("created_at");
    fields.remove("updated_at");
    record
}

#[tokio::test]
async fn test_undo_update_round_trip() {
    let app = common::build_test_app();
    let token = admin_token();
    let response = post_json_auth(
        app.clone(),
        "/api/books",
        json!({
            "id": "b1",
            "title": "Original",
            "series": "The Long Road",
            "book_number": 1,
            "year": 2019,
            "description": "Short blurb",
            "long_description": "A much longer blurb",
            "cover_image": "/covers/b1.jpg",
            "featured": true,
            "characters": ["Ada", "Bram"],
            "themes": ["home"],
            "quotes": ["Nothing ends."],
            "genre": ["fantasy"],
            "awards": ["Hugo shortlist"],
            "author_name": "A. Writer",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let original = body_json(response).await["data"].clone();

    let response = put_json_auth(
        app.clone(),
        "/api/books/b1",
        json!({
            "title": "Edited",
            "series": null,
            "year": 2024,
            "featured": false,
            "themes": ["loss"],
            "cover_image": null,
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["series"], Value::Null);

    assert!(undo(&app, "books", "b1").await);

    let restored = body_json(get(app.clone(), "/api/books/b1").await).await["data"].clone();
    assert_eq!(content_of(&restored), content_of(&original));
    assert_eq!(restored["created_at"], original["created_at"]);

    let entries = record_history(&app, "books", "b1").await;
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["description"], "Undo: Updated book \"Edited\"");
    assert_snapshot_invariant(&entries);

    // Undo again re-applies the edit.
    assert!(undo(&app, "books", "b1").await);
    let redone = body_json(get(app, "/api/books/b1").await).await["data"].clone();
    assert_eq!(redone["title"], "Edited");
    assert_eq!(redone["series"], Value::Null);
}

#[tokio::test]
async fn test_undo_blog_post_update_round_trip() {
    let app = common::build_test_app();
    let token = admin_token();
    let response = post_json_auth(
        app.clone(),
        "/api/blog-posts",
        json!({
            "title": "Launch Day",
            "excerpt": "The book is out",
            "content": "Long body",
            "date": "2024-09-01",
            "read_time": "4 min",
            "category": "news",
            "featured": true,
            "tags": ["launch", "books"],
            "author_name": "A. Writer",
            "published": true,
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let original = body_json(response).await["data"].clone();
    let uri = format!("/api/admin/blog-posts/{}", original["id"]);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/blog-posts/{}", original["id"]),
        json!({
            "title": "Launch Week",
            "excerpt": null,
            "date": "2024-09-08",
            "tags": [],
            "published": false,
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(undo(&app, "blog_posts", &original["id"].to_string()).await);

    let restored = body_json(get_auth(app, &uri, &token).await).await["data"].clone();
    assert_eq!(content_of(&restored), content_of(&original));
}

#[tokio::test]
async fn test_undo_delete_restores_blog_post() {
    let app = common::build_test_app();
    let post = create_post(&app, "Gone Soon", "2024-07-07", true).await;
    let id = post["id"].to_string();
    let like = json!({ "visitor_id": "v-1" });
    post_json(app.clone(), &format!("/api/blog-posts/{id}/like"), like).await;

    let response = delete_auth(app.clone(), &format!("/api/blog-posts/{id}"), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(undo(&app, "blog_posts", &id).await);

    let response = get(app.clone(), &format!("/api/blog-posts/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let restored = body_json(response).await["data"].clone();
    assert_eq!(restored["id"], post["id"]);
    assert_eq!(restored["title"], "Gone Soon");
    assert_eq!(restored["created_at"], post["created_at"]);
    // The like went with the cascade.
    assert_eq!(restored["like_count"], 0);

    let entries = record_history(&app, "blog_posts", &id).await;
    assert_eq!(entries[0]["action"], "create");
    assert_snapshot_invariant(&entries);
}

#[tokio::test]
async fn test_undo_create_removes_book() {
    let app = common::build_test_app();
    create_book(&app, "b1", "Oops", 1).await;

    assert!(undo(&app, "books", "b1").await);

    let response = get(app, "/api/books/b1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_undo_without_history_is_false() {
    let app = common::build_test_app();

    assert!(!undo(&app, "books", "never-existed").await);
    assert!(!undo(&app, "blog_posts", "42").await);
}

#[tokio::test]
async fn test_undo_untracked_table_is_400() {
    let app = common::build_test_app();
    let response = post_auth(app, "/api/history/author/1/undo", &admin_token()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_recent_history_limit() {
    let app = common::build_test_app();
    for n in 1..=4 {
        create_book(&app, &format!("book-{n}"), "Title", n).await;
    }
    let token = admin_token();

    let json = body_json(get_auth(app.clone(), "/api/history?limit=2", &token).await).await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["record_id"], "book-4");

    // Out-of-range limits are clamped rather than rejected.
    let response = get_auth(app, "/api/history?limit=0", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_clear_history_by_table() {
    let app = common::build_test_app();
    create_book(&app, "b1", "Book", 1).await;
    create_post(&app, "Post", "2024-01-01", true).await;
    let token = admin_token();

    let response = send(
        app.clone(),
        axum::http::Method::DELETE,
        "/api/history?table=books",
        None,
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["deleted"], 1);

    let json = body_json(get_auth(app.clone(), "/api/history", &token).await).await;
    let remaining = json["data"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["table_name"], "blog_posts");

    // Nothing left to undo for the book.
    assert!(!undo(&app, "books", "b1").await);
}
