//! Handlers for blog posts and their engagement counters.
//!
//! Public routes only ever see published posts: a draft answers 404 exactly
//! like a missing id. The admin routes under `/admin/blog-posts` include
//! drafts.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quill_core::edit_history::{EditAction, TrackedTable};
use quill_core::error::CoreError;
use quill_core::types::DbId;
use quill_core::validation::{
    validate_optional_required, validate_required, MAX_POST_CONTENT_LEN, MAX_TITLE_LEN,
    MAX_VISITOR_ID_LEN,
};
use quill_db::models::blog_post::{BlogPost, CreateBlogPost, UpdateBlogPost};
use quill_db::models::like::CreateLike;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::ledger;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for `POST /blog-posts/{id}/view`.
#[derive(Debug, Serialize)]
pub struct ViewCount {
    pub blog_post_id: DbId,
    pub view_count: i32,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("BlogPost", id))
}

/// Load a post that the public is allowed to see.
pub(crate) async fn find_published(state: &AppState, id: DbId) -> AppResult<BlogPost> {
    state
        .store
        .find_blog_post(id)
        .await?
        .filter(|p| p.published)
        .ok_or_else(|| not_found(id))
}

fn validate_create(input: &CreateBlogPost) -> Result<(), CoreError> {
    validate_required("title", &input.title, MAX_TITLE_LEN)?;
    validate_required("content", &input.content, MAX_POST_CONTENT_LEN)
}

fn validate_update(input: &UpdateBlogPost) -> Result<(), CoreError> {
    validate_optional_required("title", input.title.as_deref(), MAX_TITLE_LEN)?;
    validate_optional_required("content", input.content.as_deref(), MAX_POST_CONTENT_LEN)
}

// ---------------------------------------------------------------------------
// Public reads
// ---------------------------------------------------------------------------

/// GET /api/blog-posts
///
/// Published posts, newest first.
pub async fn list_published_posts(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let posts = state.store.list_blog_posts(true).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// GET /api/blog-posts/{id}
pub async fn get_published_post(
    State(state): State<AppState>,
    AppPath(post_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = find_published(&state, post_id).await?;
    Ok(Json(DataResponse { data: post }))
}

/// POST /api/blog-posts/{id}/view
pub async fn record_view(
    State(state): State<AppState>,
    AppPath(post_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    find_published(&state, post_id).await?;
    let view_count = state
        .store
        .record_view(post_id)
        .await?
        .ok_or_else(|| not_found(post_id))?;

    Ok(Json(DataResponse {
        data: ViewCount {
            blog_post_id: post_id,
            view_count,
        },
    }))
}

/// POST /api/blog-posts/{id}/like
///
/// Idempotent per `visitor_id`.
pub async fn like_post(
    State(state): State<AppState>,
    AppPath(post_id): AppPath<DbId>,
    AppJson(input): AppJson<CreateLike>,
) -> AppResult<impl IntoResponse> {
    validate_required("visitor_id", &input.visitor_id, MAX_VISITOR_ID_LEN)?;
    find_published(&state, post_id).await?;

    let summary = state
        .store
        .like_blog_post(post_id, input.visitor_id.trim())
        .await?
        .ok_or_else(|| not_found(post_id))?;

    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/admin/blog-posts
///
/// Every post, drafts included.
pub async fn list_all_posts(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let posts = state.store.list_blog_posts(false).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// GET /api/admin/blog-posts/{id}
pub async fn get_any_post(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(post_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = state
        .store
        .find_blog_post(post_id)
        .await?
        .ok_or_else(|| not_found(post_id))?;

    Ok(Json(DataResponse { data: post }))
}

/// POST /api/blog-posts
pub async fn create_post(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateBlogPost>,
) -> AppResult<impl IntoResponse> {
    validate_create(&input)?;

    let post = state.store.create_blog_post(&input).await?;

    ledger::log_edit(
        state.store.as_ref(),
        TrackedTable::BlogPosts,
        &post.id.to_string(),
        EditAction::Create,
        None,
        Some(&post),
        &format!("Created blog post \"{}\"", post.title),
    )
    .await;

    tracing::info!(post_id = post.id, user = %admin.subject, "Blog post created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// PUT /api/blog-posts/{id}
pub async fn update_post(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(post_id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateBlogPost>,
) -> AppResult<impl IntoResponse> {
    validate_update(&input)?;

    let before = state
        .store
        .find_blog_post(post_id)
        .await?
        .ok_or_else(|| not_found(post_id))?;
    let post = state
        .store
        .update_blog_post(post_id, &input)
        .await?
        .ok_or_else(|| not_found(post_id))?;

    ledger::log_edit(
        state.store.as_ref(),
        TrackedTable::BlogPosts,
        &post_id.to_string(),
        EditAction::Update,
        Some(&before),
        Some(&post),
        &format!("Updated blog post \"{}\"", post.title),
    )
    .await;

    tracing::info!(post_id, user = %admin.subject, "Blog post updated");

    Ok(Json(DataResponse { data: post }))
}

/// DELETE /api/blog-posts/{id}
///
/// Comments and likes of the post go with it.
pub async fn delete_post(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(post_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let before = state
        .store
        .find_blog_post(post_id)
        .await?
        .ok_or_else(|| not_found(post_id))?;

    if !state.store.delete_blog_post(post_id).await? {
        return Err(not_found(post_id));
    }

    ledger::log_edit(
        state.store.as_ref(),
        TrackedTable::BlogPosts,
        &post_id.to_string(),
        EditAction::Delete,
        Some(&before),
        None,
        &format!("Deleted blog post \"{}\"", before.title),
    )
    .await;

    tracing::info!(post_id, user = %admin.subject, "Blog post deleted");

    Ok(StatusCode::NO_CONTENT)
}
