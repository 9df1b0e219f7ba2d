//! The storage seam between HTTP handlers and persistence.
//!
//! [`ContentStore`] lists every operation the API needs. [`PgStore`] is the
//! production backend and delegates to the repositories;
//! [`MemoryStore`](crate::memory::MemoryStore) is the single-process
//! fallback used for local previews and tests.

use async_trait::async_trait;
use quill_core::comments::CommentStatus;
use quill_core::types::DbId;

use crate::error::StoreError;
use crate::models::author::{Author, UpsertAuthor};
use crate::models::blog_post::{BlogPost, CreateBlogPost, UpdateBlogPost};
use crate::models::book::{Book, CreateBook, UpdateBook};
use crate::models::comment::{Comment, CreateComment};
use crate::models::edit_history::{CreateEditEntry, EditEntry};
use crate::models::like::LikeSummary;
use crate::repositories::{
    AuthorRepo, BlogPostRepo, BookRepo, CommentRepo, EditHistoryRepo, LikeRepo,
};
use crate::DbPool;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Every read and write the content API performs.
///
/// Lookups and mutations addressed by id return `Option` / `bool` so callers
/// decide how to report a missing row.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Cheap liveness check for the health endpoint.
    async fn ping(&self) -> StoreResult<()>;

    // --- Books ---

    async fn list_books(&self) -> StoreResult<Vec<Book>>;
    async fn find_book(&self, id: &str) -> StoreResult<Option<Book>>;
    async fn create_book(&self, input: &CreateBook) -> StoreResult<Book>;
    async fn update_book(&self, id: &str, input: &UpdateBook) -> StoreResult<Option<Book>>;
    /// Overwrite all content fields of `book.id` with `book`.
    async fn replace_book(&self, book: &Book) -> StoreResult<Option<Book>>;
    /// Insert `book` again with its original id.
    async fn restore_book(&self, book: &Book) -> StoreResult<Book>;
    async fn delete_book(&self, id: &str) -> StoreResult<bool>;

    // --- Blog posts ---

    async fn list_blog_posts(&self, published_only: bool) -> StoreResult<Vec<BlogPost>>;
    async fn find_blog_post(&self, id: DbId) -> StoreResult<Option<BlogPost>>;
    async fn create_blog_post(&self, input: &CreateBlogPost) -> StoreResult<BlogPost>;
    async fn update_blog_post(
        &self,
        id: DbId,
        input: &UpdateBlogPost,
    ) -> StoreResult<Option<BlogPost>>;
    /// Overwrite all content fields of `post.id`. Counters are kept.
    async fn replace_blog_post(&self, post: &BlogPost) -> StoreResult<Option<BlogPost>>;
    /// Insert `post` again with its original id and counters.
    async fn restore_blog_post(&self, post: &BlogPost) -> StoreResult<BlogPost>;
    async fn delete_blog_post(&self, id: DbId) -> StoreResult<bool>;
    /// Increment the view counter, returning the new total.
    async fn record_view(&self, id: DbId) -> StoreResult<Option<i32>>;
    /// Record a visitor's like (once per visitor) and return the total.
    async fn like_blog_post(&self, id: DbId, visitor_id: &str)
        -> StoreResult<Option<LikeSummary>>;

    // --- Author ---

    async fn find_author(&self) -> StoreResult<Option<Author>>;
    async fn upsert_author(&self, input: &UpsertAuthor) -> StoreResult<Author>;

    // --- Comments ---

    async fn list_approved_comments(&self, blog_post_id: DbId) -> StoreResult<Vec<Comment>>;
    async fn list_comments(&self, status: Option<CommentStatus>) -> StoreResult<Vec<Comment>>;
    async fn create_comment(
        &self,
        blog_post_id: DbId,
        input: &CreateComment,
    ) -> StoreResult<Comment>;
    /// Change a comment's status and refresh its post's `comment_count`.
    async fn update_comment_status(
        &self,
        id: DbId,
        status: CommentStatus,
    ) -> StoreResult<Option<Comment>>;
    /// Delete a comment and refresh its post's `comment_count`.
    async fn delete_comment(&self, id: DbId) -> StoreResult<bool>;

    // --- Edit history ---

    async fn append_edit(&self, input: &CreateEditEntry) -> StoreResult<EditEntry>;
    async fn latest_edit(&self, table_name: &str, record_id: &str)
        -> StoreResult<Option<EditEntry>>;
    async fn record_history(&self, table_name: &str, record_id: &str)
        -> StoreResult<Vec<EditEntry>>;
    async fn recent_history(&self, limit: i64) -> StoreResult<Vec<EditEntry>>;
    async fn clear_history(&self, table_name: Option<&str>) -> StoreResult<u64>;
}

// ---------------------------------------------------------------------------
// Postgres backend
// ---------------------------------------------------------------------------

/// [`ContentStore`] backed by PostgreSQL through the repository structs.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        Ok(BookRepo::list(&self.pool).await?)
    }

    async fn find_book(&self, id: &str) -> StoreResult<Option<Book>> {
        Ok(BookRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_book(&self, input: &CreateBook) -> StoreResult<Book> {
        Ok(BookRepo::create(&self.pool, input).await?)
    }

    async fn update_book(&self, id: &str, input: &UpdateBook) -> StoreResult<Option<Book>> {
        Ok(BookRepo::update(&self.pool, id, input).await?)
    }

    async fn replace_book(&self, book: &Book) -> StoreResult<Option<Book>> {
        Ok(BookRepo::replace(&self.pool, book).await?)
    }

    async fn restore_book(&self, book: &Book) -> StoreResult<Book> {
        Ok(BookRepo::restore(&self.pool, book).await?)
    }

    async fn delete_book(&self, id: &str) -> StoreResult<bool> {
        Ok(BookRepo::delete(&self.pool, id).await?)
    }

    async fn list_blog_posts(&self, published_only: bool) -> StoreResult<Vec<BlogPost>> {
        Ok(BlogPostRepo::list(&self.pool, published_only).await?)
    }

    async fn find_blog_post(&self, id: DbId) -> StoreResult<Option<BlogPost>> {
        Ok(BlogPostRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_blog_post(&self, input: &CreateBlogPost) -> StoreResult<BlogPost> {
        Ok(BlogPostRepo::create(&self.pool, input).await?)
    }

    async fn update_blog_post(
        &self,
        id: DbId,
        input: &UpdateBlogPost,
    ) -> StoreResult<Option<BlogPost>> {
        Ok(BlogPostRepo::update(&self.pool, id, input).await?)
    }

    async fn replace_blog_post(&self, post: &BlogPost) -> StoreResult<Option<BlogPost>> {
        Ok(BlogPostRepo::replace(&self.pool, post).await?)
    }

    async fn restore_blog_post(&self, post: &BlogPost) -> StoreResult<BlogPost> {
        let mut restored = BlogPostRepo::restore(&self.pool, post).await?;
        // Likes and comments went with the cascade; the snapshot's counters are stale.
        if let Some(likes) = BlogPostRepo::refresh_like_count(&self.pool, restored.id).await? {
            restored.like_count = likes;
        }
        if let Some(comments) =
            BlogPostRepo::refresh_comment_count(&self.pool, restored.id).await?
        {
            restored.comment_count = comments;
        }
        Ok(restored)
    }

    async fn delete_blog_post(&self, id: DbId) -> StoreResult<bool> {
        Ok(BlogPostRepo::delete(&self.pool, id).await?)
    }

    async fn record_view(&self, id: DbId) -> StoreResult<Option<i32>> {
        Ok(BlogPostRepo::increment_views(&self.pool, id).await?)
    }

    async fn like_blog_post(
        &self,
        id: DbId,
        visitor_id: &str,
    ) -> StoreResult<Option<LikeSummary>> {
        if BlogPostRepo::find_by_id(&self.pool, id).await?.is_none() {
            return Ok(None);
        }
        LikeRepo::add(&self.pool, id, visitor_id).await?;
        let like_count = BlogPostRepo::refresh_like_count(&self.pool, id).await?;
        Ok(like_count.map(|like_count| LikeSummary {
            blog_post_id: id,
            like_count,
        }))
    }

    async fn find_author(&self) -> StoreResult<Option<Author>> {
        Ok(AuthorRepo::find(&self.pool).await?)
    }

    async fn upsert_author(&self, input: &UpsertAuthor) -> StoreResult<Author> {
        Ok(AuthorRepo::upsert(&self.pool, input).await?)
    }

    async fn list_approved_comments(&self, blog_post_id: DbId) -> StoreResult<Vec<Comment>> {
        Ok(CommentRepo::list_approved_for_post(&self.pool, blog_post_id).await?)
    }

    async fn list_comments(&self, status: Option<CommentStatus>) -> StoreResult<Vec<Comment>> {
        Ok(CommentRepo::list(&self.pool, status).await?)
    }

    async fn create_comment(
        &self,
        blog_post_id: DbId,
        input: &CreateComment,
    ) -> StoreResult<Comment> {
        Ok(CommentRepo::create(&self.pool, blog_post_id, input).await?)
    }

    async fn update_comment_status(
        &self,
        id: DbId,
        status: CommentStatus,
    ) -> StoreResult<Option<Comment>> {
        let comment = CommentRepo::update_status(&self.pool, id, status).await?;
        if let Some(c) = &comment {
            BlogPostRepo::refresh_comment_count(&self.pool, c.blog_post_id).await?;
        }
        Ok(comment)
    }

    async fn delete_comment(&self, id: DbId) -> StoreResult<bool> {
        match CommentRepo::delete(&self.pool, id).await? {
            Some(blog_post_id) => {
                BlogPostRepo::refresh_comment_count(&self.pool, blog_post_id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn append_edit(&self, input: &CreateEditEntry) -> StoreResult<EditEntry> {
        Ok(EditHistoryRepo::create(&self.pool, input).await?)
    }

    async fn latest_edit(
        &self,
        table_name: &str,
        record_id: &str,
    ) -> StoreResult<Option<EditEntry>> {
        Ok(EditHistoryRepo::find_latest(&self.pool, table_name, record_id).await?)
    }

    async fn record_history(
        &self,
        table_name: &str,
        record_id: &str,
    ) -> StoreResult<Vec<EditEntry>> {
        Ok(EditHistoryRepo::list_for_record(&self.pool, table_name, record_id).await?)
    }

    async fn recent_history(&self, limit: i64) -> StoreResult<Vec<EditEntry>> {
        Ok(EditHistoryRepo::list_recent(&self.pool, limit).await?)
    }

    async fn clear_history(&self, table_name: Option<&str>) -> StoreResult<u64> {
        Ok(EditHistoryRepo::clear(&self.pool, table_name).await?)
    }
}
