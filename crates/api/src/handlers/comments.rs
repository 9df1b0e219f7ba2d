//! Handlers for reader comments.
//!
//! Readers submit comments on published posts; they stay `pending` until the
//! admin approves them, and only approved comments are listed publicly.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quill_core::comments::CommentStatus;
use quill_core::error::CoreError;
use quill_core::types::DbId;
use quill_core::validation::{validate_email, validate_required, MAX_COMMENT_LEN, MAX_TITLE_LEN};
use quill_db::models::comment::{CreateComment, UpdateCommentStatus};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::blog_posts::find_published;
use crate::middleware::rbac::RequireAdmin;
use crate::query::CommentStatusParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_create(input: &CreateComment) -> Result<(), CoreError> {
    validate_required("author_name", &input.author_name, MAX_TITLE_LEN)?;
    validate_email("author_email", input.author_email.as_deref())?;
    validate_required("content", &input.content, MAX_COMMENT_LEN)
}

/// GET /api/blog-posts/{id}/comments
///
/// Approved comments of a published post, oldest first.
pub async fn list_post_comments(
    State(state): State<AppState>,
    AppPath(post_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    find_published(&state, post_id).await?;
    let comments = state.store.list_approved_comments(post_id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/blog-posts/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    AppPath(post_id): AppPath<DbId>,
    AppJson(input): AppJson<CreateComment>,
) -> AppResult<impl IntoResponse> {
    validate_create(&input)?;
    find_published(&state, post_id).await?;

    let comment = state.store.create_comment(post_id, &input).await?;

    tracing::info!(comment_id = comment.id, post_id, "Comment submitted for moderation");

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// GET /api/comments?status=
///
/// Moderation queue, newest first, optionally filtered by status.
pub async fn list_comments(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<CommentStatusParams>,
) -> AppResult<impl IntoResponse> {
    let status = params
        .status
        .as_deref()
        .map(CommentStatus::parse)
        .transpose()?;

    let comments = state.store.list_comments(status).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// PUT /api/comments/{id}/status
pub async fn update_comment_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(comment_id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateCommentStatus>,
) -> AppResult<impl IntoResponse> {
    let comment = state
        .store
        .update_comment_status(comment_id, input.status)
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", comment_id))?;

    tracing::info!(
        comment_id,
        status = %input.status,
        user = %admin.subject,
        "Comment status changed",
    );

    Ok(Json(DataResponse { data: comment }))
}

/// DELETE /api/comments/{id}
pub async fn delete_comment(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(comment_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    if !state.store.delete_comment(comment_id).await? {
        return Err(AppError::Core(CoreError::not_found("Comment", comment_id)));
    }

    tracing::info!(comment_id, user = %admin.subject, "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}
