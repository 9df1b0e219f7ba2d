//! Route definitions for blog posts.
//!
//! Two routers are provided:
//! - `router()` for the public reads and admin writes mounted at `/blog-posts`
//! - `admin_router()` for draft-inclusive reads mounted at `/admin/blog-posts`

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{blog_posts, comments};
use crate::state::AppState;

/// Blog post routes mounted at `/blog-posts`.
///
/// ```text
/// GET    /                 -> list_published_posts
/// POST   /                 -> create_post          (admin)
/// GET    /{id}             -> get_published_post
/// PUT    /{id}             -> update_post          (admin)
/// DELETE /{id}             -> delete_post          (admin)
/// GET    /{id}/comments    -> list_post_comments
/// POST   /{id}/comments    -> create_comment
/// POST   /{id}/like        -> like_post
/// POST   /{id}/view        -> record_view
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(blog_posts::list_published_posts).post(blog_posts::create_post),
        )
        .route(
            "/{id}",
            get(blog_posts::get_published_post)
                .put(blog_posts::update_post)
                .delete(blog_posts::delete_post),
        )
        .route(
            "/{id}/comments",
            get(comments::list_post_comments).post(comments::create_comment),
        )
        .route("/{id}/like", post(blog_posts::like_post))
        .route("/{id}/view", post(blog_posts::record_view))
}

/// Admin blog post routes mounted at `/admin/blog-posts`.
///
/// ```text
/// GET /       -> list_all_posts
/// GET /{id}   -> get_any_post
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(blog_posts::list_all_posts))
        .route("/{id}", get(blog_posts::get_any_post))
}
