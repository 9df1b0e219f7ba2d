//! Route definitions for the edit history ledger.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// History routes mounted at `/history` (admin only).
///
/// ```text
/// GET    /                          -> list_recent
/// DELETE /                          -> clear_history
/// GET    /{table}/{record_id}       -> list_record_history
/// POST   /{table}/{record_id}/undo  -> undo_last_edit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(history::list_recent).delete(history::clear_history),
        )
        .route("/{table}/{record_id}", get(history::list_record_history))
        .route("/{table}/{record_id}/undo", post(history::undo_last_edit))
}
