//! Repository for the `blog_posts` table.

use quill_core::types::DbId;
use sqlx::PgPool;

use super::clearable;
use crate::models::blog_post::{BlogPost, CreateBlogPost, UpdateBlogPost};

/// Column list for `blog_posts` queries.
const COLUMNS: &str = "\
    id, title, excerpt, content, date, read_time, category, featured, tags, \
    author_name, published, view_count, like_count, comment_count, \
    created_at, updated_at";

/// Provides CRUD and counter operations for blog posts.
pub struct BlogPostRepo;

impl BlogPostRepo {
    /// List posts newest first. With `published_only`, drafts are excluded.
    pub async fn list(pool: &PgPool, published_only: bool) -> Result<Vec<BlogPost>, sqlx::Error> {
        let query = if published_only {
            format!(
                "SELECT {COLUMNS} FROM blog_posts WHERE published = TRUE \
                 ORDER BY date DESC, id DESC"
            )
        } else {
            format!("SELECT {COLUMNS} FROM blog_posts ORDER BY date DESC, id DESC")
        };
        sqlx::query_as::<_, BlogPost>(&query).fetch_all(pool).await
    }

    /// Find a post by id, drafts included.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blog_posts WHERE id = $1");
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new post. Counters start at zero.
    pub async fn create(pool: &PgPool, input: &CreateBlogPost) -> Result<BlogPost, sqlx::Error> {
        let query = format!(
            "INSERT INTO blog_posts \
                 (title, excerpt, content, date, read_time, category, featured, tags, \
                  author_name, published) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(&input.title)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(input.date)
            .bind(&input.read_time)
            .bind(&input.category)
            .bind(input.featured)
            .bind(&input.tags)
            .bind(&input.author_name)
            .bind(input.published)
            .fetch_one(pool)
            .await
    }

    /// Partially update a post and refresh `updated_at`. Nullable fields
    /// sent as `null` are cleared.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBlogPost,
    ) -> Result<Option<BlogPost>, sqlx::Error> {
        let (excerpt_set, excerpt) = clearable(&input.excerpt);
        let (read_time_set, read_time) = clearable(&input.read_time);
        let (category_set, category) = clearable(&input.category);
        let (author_name_set, author_name) = clearable(&input.author_name);

        let query = format!(
            "UPDATE blog_posts SET \
                 title = COALESCE($2, title), \
                 excerpt = CASE WHEN $3 THEN $4 ELSE excerpt END, \
                 content = COALESCE($5, content), \
                 date = COALESCE($6, date), \
                 read_time = CASE WHEN $7 THEN $8 ELSE read_time END, \
                 category = CASE WHEN $9 THEN $10 ELSE category END, \
                 featured = COALESCE($11, featured), \
                 tags = COALESCE($12, tags), \
                 author_name = CASE WHEN $13 THEN $14 ELSE author_name END, \
                 published = COALESCE($15, published), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(excerpt_set)
            .bind(excerpt)
            .bind(&input.content)
            .bind(input.date)
            .bind(read_time_set)
            .bind(read_time)
            .bind(category_set)
            .bind(category)
            .bind(input.featured)
            .bind(&input.tags)
            .bind(author_name_set)
            .bind(author_name)
            .bind(input.published)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite every content column of `post.id`.
    ///
    /// The engagement counters are left alone: they are derived from
    /// `blog_likes` / `blog_comments`, not from the snapshot.
    pub async fn replace(pool: &PgPool, post: &BlogPost) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!(
            "UPDATE blog_posts SET \
                 title = $2, excerpt = $3, content = $4, date = $5, read_time = $6, \
                 category = $7, featured = $8, tags = $9, author_name = $10, \
                 published = $11, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(post.id)
            .bind(&post.title)
            .bind(&post.excerpt)
            .bind(&post.content)
            .bind(post.date)
            .bind(&post.read_time)
            .bind(&post.category)
            .bind(post.featured)
            .bind(&post.tags)
            .bind(&post.author_name)
            .bind(post.published)
            .fetch_optional(pool)
            .await
    }

    /// Insert a previously deleted post again with its original id,
    /// counters and `created_at`. Callers refresh the like and comment
    /// counters afterwards.
    pub async fn restore(pool: &PgPool, post: &BlogPost) -> Result<BlogPost, sqlx::Error> {
        let query = format!(
            "INSERT INTO blog_posts \
                 (id, title, excerpt, content, date, read_time, category, featured, tags, \
                  author_name, published, view_count, like_count, comment_count, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(post.id)
            .bind(&post.title)
            .bind(&post.excerpt)
            .bind(&post.content)
            .bind(post.date)
            .bind(&post.read_time)
            .bind(&post.category)
            .bind(post.featured)
            .bind(&post.tags)
            .bind(&post.author_name)
            .bind(post.published)
            .bind(post.view_count)
            .bind(post.like_count)
            .bind(post.comment_count)
            .bind(post.created_at)
            .fetch_one(pool)
            .await
    }

    /// Delete a post (comments and likes cascade). Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the view counter. Returns the new count, or `None` if the
    /// post does not exist.
    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE blog_posts SET view_count = view_count + 1 \
             WHERE id = $1 RETURNING view_count",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Recompute `like_count` from `blog_likes`.
    pub async fn refresh_like_count(pool: &PgPool, id: DbId) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE blog_posts SET like_count = \
                 (SELECT COUNT(*)::INTEGER FROM blog_likes WHERE blog_post_id = $1) \
             WHERE id = $1 RETURNING like_count",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Recompute `comment_count` from approved `blog_comments`.
    pub async fn refresh_comment_count(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE blog_posts SET comment_count = \
                 (SELECT COUNT(*)::INTEGER FROM blog_comments \
                  WHERE blog_post_id = $1 AND status = 'approved') \
             WHERE id = $1 RETURNING comment_count",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
