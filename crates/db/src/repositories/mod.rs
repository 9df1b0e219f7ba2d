//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. All user input is bound as
//! query parameters.

pub mod author_repo;
pub mod blog_post_repo;
pub mod book_repo;
pub mod comment_repo;
pub mod edit_history_repo;
pub mod like_repo;

pub use author_repo::AuthorRepo;
pub use blog_post_repo::BlogPostRepo;
pub use book_repo::BookRepo;
pub use comment_repo::CommentRepo;
pub use edit_history_repo::EditHistoryRepo;
pub use like_repo::LikeRepo;

/// Split a clearable update field into its `(provided, value)` binds, for
/// `col = CASE WHEN $provided THEN $value ELSE col END`.
pub(crate) fn clearable<T: Clone>(field: &Option<Option<T>>) -> (bool, Option<T>) {
    (field.is_some(), field.clone().flatten())
}
