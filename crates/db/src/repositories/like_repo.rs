//! Repository for the `blog_likes` table.

use quill_core::types::DbId;
use sqlx::PgPool;

/// Records reader likes. A visitor can like a post once.
pub struct LikeRepo;

impl LikeRepo {
    /// Record a like. Returns `true` if it was new, `false` if the visitor
    /// had already liked the post.
    pub async fn add(
        pool: &PgPool,
        blog_post_id: DbId,
        visitor_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO blog_likes (blog_post_id, visitor_id) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_blog_likes_post_visitor DO NOTHING",
        )
        .bind(blog_post_id)
        .bind(visitor_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
