//! Handlers for the `/books` resource.
//!
//! Reads are public; writes require the admin role and are recorded in the
//! edit history.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quill_core::edit_history::{EditAction, TrackedTable};
use quill_core::error::CoreError;
use quill_core::validation::{
    validate_book_number, validate_optional_required, validate_required, validate_slug,
    MAX_TITLE_LEN,
};
use quill_db::models::book::{CreateBook, UpdateBook};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::ledger;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_create(input: &CreateBook) -> Result<(), CoreError> {
    validate_slug("id", &input.id)?;
    validate_required("title", &input.title, MAX_TITLE_LEN)?;
    validate_book_number(input.book_number)
}

fn validate_update(input: &UpdateBook) -> Result<(), CoreError> {
    validate_optional_required("title", input.title.as_deref(), MAX_TITLE_LEN)?;
    if let Some(n) = input.book_number {
        validate_book_number(n)?;
    }
    Ok(())
}

/// GET /api/books
///
/// All books in series order.
pub async fn list_books(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let books = state.store.list_books().await?;
    Ok(Json(DataResponse { data: books }))
}

/// GET /api/books/{id}
pub async fn get_book(
    State(state): State<AppState>,
    AppPath(book_id): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let book = state
        .store
        .find_book(&book_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Book", &book_id))?;

    Ok(Json(DataResponse { data: book }))
}

/// POST /api/books
pub async fn create_book(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateBook>,
) -> AppResult<impl IntoResponse> {
    validate_create(&input)?;

    let book = state.store.create_book(&input).await?;

    ledger::log_edit(
        state.store.as_ref(),
        TrackedTable::Books,
        &book.id,
        EditAction::Create,
        None,
        Some(&book),
        &format!("Created book \"{}\"", book.title),
    )
    .await;

    tracing::info!(book_id = %book.id, user = %admin.subject, "Book created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: book })))
}

/// PUT /api/books/{id}
///
/// Partial update; omitted fields are left unchanged.
pub async fn update_book(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(book_id): AppPath<String>,
    AppJson(input): AppJson<UpdateBook>,
) -> AppResult<impl IntoResponse> {
    validate_update(&input)?;

    let not_found = || AppError::Core(CoreError::not_found("Book", &book_id));
    let before = state.store.find_book(&book_id).await?.ok_or_else(not_found)?;
    let book = state
        .store
        .update_book(&book_id, &input)
        .await?
        .ok_or_else(not_found)?;

    ledger::log_edit(
        state.store.as_ref(),
        TrackedTable::Books,
        &book.id,
        EditAction::Update,
        Some(&before),
        Some(&book),
        &format!("Updated book \"{}\"", book.title),
    )
    .await;

    tracing::info!(book_id = %book.id, user = %admin.subject, "Book updated");

    Ok(Json(DataResponse { data: book }))
}

/// DELETE /api/books/{id}
pub async fn delete_book(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(book_id): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let not_found = || AppError::Core(CoreError::not_found("Book", &book_id));
    let before = state.store.find_book(&book_id).await?.ok_or_else(not_found)?;

    if !state.store.delete_book(&book_id).await? {
        return Err(not_found());
    }

    ledger::log_edit(
        state.store.as_ref(),
        TrackedTable::Books,
        &book_id,
        EditAction::Delete,
        Some(&before),
        None,
        &format!("Deleted book \"{}\"", before.title),
    )
    .await;

    tracing::info!(book_id = %book_id, user = %admin.subject, "Book deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(id: &str, title: &str, book_number: i32) -> CreateBook {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "book_number": book_number,
        }))
        .unwrap()
    }

    #[test]
    fn test_validate_create() {
        assert!(validate_create(&create("the-first-book", "The First Book", 1)).is_ok());
        assert!(validate_create(&create("Bad Slug", "Title", 1)).is_err());
        assert!(validate_create(&create("ok", "   ", 1)).is_err());
        assert!(validate_create(&create("ok", "Title", -1)).is_err());
    }

    #[test]
    fn test_validate_update_blank_title() {
        let input = UpdateBook {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_update(&input).is_err());
        assert!(validate_update(&UpdateBook::default()).is_ok());
    }
}
