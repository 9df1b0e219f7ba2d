//! HTTP-level tests for the `/books` resource.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, book_body, create_book, delete_auth, get, post_json_auth,
    put_json_auth,
};

#[tokio::test]
async fn test_create_then_get_returns_same_fields() {
    let app = common::build_test_app();
    let created = create_book(&app, "the-first-book", "The First Book", 1).await;

    assert_eq!(created["id"], "the-first-book");
    assert_eq!(created["series"], "The Long Road");
    assert_eq!(created["themes"], serde_json::json!(["home", "memory"]));
    assert_eq!(created["featured"], false);
    assert_eq!(created["created_at"], created["updated_at"]);

    let response = get(app, "/api/books/the-first-book").await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["data"], created);
}

#[tokio::test]
async fn test_books_listed_by_book_number() {
    let app = common::build_test_app();
    create_book(&app, "book-three", "Three", 3).await;
    create_book(&app, "book-one", "One", 1).await;
    create_book(&app, "book-two", "Two", 2).await;

    let json = body_json(get(app, "/api/books").await).await;
    let ids: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["book-one", "book-two", "book-three"]);
}

#[tokio::test]
async fn test_update_refreshes_updated_at() {
    let app = common::build_test_app();
    let created = create_book(&app, "b1", "Draft Title", 1).await;

    let response = put_json_auth(
        app,
        "/api/books/b1",
        serde_json::json!({ "title": "Final Title" }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["title"], "Final Title");
    assert_eq!(updated["series"], created["series"]);
    assert_eq!(updated["created_at"], created["created_at"]);

    let before: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(created["updated_at"].clone()).unwrap();
    let after: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(updated["updated_at"].clone()).unwrap();
    assert!(after > before);
}

#[tokio::test]
async fn test_delete_then_not_found_twice() {
    let app = common::build_test_app();
    create_book(&app, "b1", "Title", 1).await;
    let token = admin_token();

    let response = delete_auth(app.clone(), "/api/books/b1", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), "/api/books/b1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app, "/api/books/b1", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_id_conflicts() {
    let app = common::build_test_app();
    create_book(&app, "b1", "Title", 1).await;

    let response =
        post_json_auth(app, "/api/books", book_body("b1", "Other", 2), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_slug_rejected() {
    let app = common::build_test_app();
    let response = post_json_auth(
        app,
        "/api/books",
        book_body("Not A Slug", "Title", 1),
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_missing_book_is_404() {
    let app = common::build_test_app();
    let response = put_json_auth(
        app,
        "/api/books/missing",
        serde_json::json!({ "title": "X" }),
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_null_clears_and_absent_keeps() {
    let app = common::build_test_app();
    let token = admin_token();
    let response = post_json_auth(
        app.clone(),
        "/api/books",
        serde_json::json!({
            "id": "b1",
            "title": "Saga One",
            "book_number": 1,
            "series": "Saga",
            "description": "Blurb",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = put_json_auth(
        app.clone(),
        "/api/books/b1",
        serde_json::json!({ "series": null }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let book = body_json(get(app, "/api/books/b1").await).await["data"].clone();
    assert_eq!(book["series"], serde_json::Value::Null);
    assert_eq!(book["description"], "Blurb");
    assert_eq!(book["title"], "Saga One");
}
