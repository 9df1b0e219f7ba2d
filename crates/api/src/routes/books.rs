//! Route definitions for `/books`.

use axum::routing::get;
use axum::Router;

use crate::handlers::books;
use crate::state::AppState;

/// Book routes mounted at `/books`.
///
/// ```text
/// GET    /       -> list_books
/// POST   /       -> create_book     (admin)
/// GET    /{id}   -> get_book
/// PUT    /{id}   -> update_book     (admin)
/// DELETE /{id}   -> delete_book     (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(books::list_books).post(books::create_book))
        .route(
            "/{id}",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
}
