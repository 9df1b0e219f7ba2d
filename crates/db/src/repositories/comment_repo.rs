//! Repository for the `blog_comments` table.

use quill_core::comments::CommentStatus;
use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment};

/// Column list for `blog_comments` queries.
const COLUMNS: &str = "\
    id, blog_post_id, author_name, author_email, content, status, \
    created_at, updated_at";

/// Provides moderation and listing operations for reader comments.
pub struct CommentRepo;

impl CommentRepo {
    /// List approved comments for a post, oldest first.
    pub async fn list_approved_for_post(
        pool: &PgPool,
        blog_post_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blog_comments \
             WHERE blog_post_id = $1 AND status = 'approved' \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(blog_post_id)
            .fetch_all(pool)
            .await
    }

    /// List every comment newest first, optionally narrowed to one status.
    pub async fn list(
        pool: &PgPool,
        status: Option<CommentStatus>,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blog_comments \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(status.map(CommentStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// Insert a reader comment in the `pending` state.
    pub async fn create(
        pool: &PgPool,
        blog_post_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO blog_comments (blog_post_id, author_name, author_email, content) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(blog_post_id)
            .bind(&input.author_name)
            .bind(&input.author_email)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Set a comment's moderation status.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: CommentStatus,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE blog_comments SET status = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a comment. Returns the post it belonged to, or `None` if no
    /// row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "DELETE FROM blog_comments WHERE id = $1 RETURNING blog_post_id",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
