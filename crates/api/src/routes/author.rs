//! Route definitions for `/author`.

use axum::routing::get;
use axum::Router;

use crate::handlers::author;
use crate::state::AppState;

/// Author profile routes mounted at `/author`.
///
/// ```text
/// GET /  -> get_author
/// PUT /  -> upsert_author   (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(author::get_author).put(author::upsert_author))
}
