pub mod auth;
pub mod author;
pub mod blog_posts;
pub mod books;
pub mod comments;
pub mod health;
pub mod history;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                   service health (public)
///
/// /auth/login                               login (public)
///
/// /books                                    list (public), create (admin)
/// /books/{id}                               get (public), update, delete (admin)
///
/// /blog-posts                               list published (public), create (admin)
/// /blog-posts/{id}                          get published (public), update, delete (admin)
/// /blog-posts/{id}/comments                 approved comments, submit comment (public)
/// /blog-posts/{id}/like                     like once per visitor (public)
/// /blog-posts/{id}/view                     count a view (public)
///
/// /admin/blog-posts                         list incl. drafts (admin)
/// /admin/blog-posts/{id}                    get incl. drafts (admin)
///
/// /author                                   get (public), upsert (admin)
///
/// /comments                                 moderation queue (admin)
/// /comments/{id}                            delete (admin)
/// /comments/{id}/status                     approve / reject (admin)
///
/// /history                                  recent entries, clear (admin)
/// /history/{table}/{record_id}              record history (admin)
/// /history/{table}/{record_id}/undo         undo newest edit (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/auth", auth::router())
        .nest("/books", books::router())
        .nest("/blog-posts", blog_posts::router())
        .nest("/admin/blog-posts", blog_posts::admin_router())
        .nest("/author", author::router())
        .nest("/comments", comments::router())
        .nest("/history", history::router())
}
