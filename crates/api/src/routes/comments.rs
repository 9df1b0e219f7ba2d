//! Route definitions for comment moderation.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Moderation routes mounted at `/comments` (admin only).
///
/// ```text
/// GET    /               -> list_comments
/// DELETE /{id}           -> delete_comment
/// PUT    /{id}/status    -> update_comment_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(comments::list_comments))
        .route("/{id}", delete(comments::delete_comment))
        .route("/{id}/status", put(comments::update_comment_status))
}
