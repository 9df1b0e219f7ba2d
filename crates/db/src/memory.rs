//! In-process [`ContentStore`] backend.
//!
//! Holds every table in a single [`RwLock`]-guarded struct owned by the
//! store value itself, so each server (or test) gets its own isolated data.
//! Nothing is persisted and nothing is shared between processes; run more
//! than one instance only against [`PgStore`](crate::store::PgStore).

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use quill_core::comments::CommentStatus;
use quill_core::types::{DbId, Timestamp};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::author::{Author, UpsertAuthor};
use crate::models::blog_post::{BlogPost, CreateBlogPost, UpdateBlogPost};
use crate::models::book::{Book, CreateBook, UpdateBook};
use crate::models::comment::{Comment, CreateComment};
use crate::models::edit_history::{CreateEditEntry, EditEntry};
use crate::models::like::LikeSummary;
use crate::store::{ContentStore, StoreResult};

/// Initial content for a [`MemoryStore`], typically loaded from a JSON file.
///
/// Entries use the same shapes as the create endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedData {
    pub books: Vec<CreateBook>,
    pub blog_posts: Vec<CreateBlogPost>,
    pub author: Option<UpsertAuthor>,
}

#[derive(Debug, Default)]
struct MemoryState {
    books: BTreeMap<String, Book>,
    blog_posts: BTreeMap<DbId, BlogPost>,
    author: Option<Author>,
    comments: BTreeMap<DbId, Comment>,
    likes: BTreeSet<(DbId, String)>,
    history: Vec<EditEntry>,
    last_post_id: DbId,
    last_comment_id: DbId,
    last_history_id: DbId,
}

impl MemoryState {
    fn next_post_id(&mut self) -> DbId {
        self.last_post_id += 1;
        self.last_post_id
    }

    fn next_comment_id(&mut self) -> DbId {
        self.last_comment_id += 1;
        self.last_comment_id
    }

    fn next_history_id(&mut self) -> DbId {
        self.last_history_id += 1;
        self.last_history_id
    }

    fn refresh_comment_count(&mut self, blog_post_id: DbId) {
        let approved = self
            .comments
            .values()
            .filter(|c| {
                c.blog_post_id == blog_post_id && c.status == CommentStatus::Approved.as_str()
            })
            .count();
        if let Some(post) = self.blog_posts.get_mut(&blog_post_id) {
            post.comment_count = approved as i32;
        }
    }

    fn refresh_like_count(&mut self, blog_post_id: DbId) -> Option<i32> {
        let likes = self
            .likes
            .iter()
            .filter(|(post_id, _)| *post_id == blog_post_id)
            .count() as i32;
        let post = self.blog_posts.get_mut(&blog_post_id)?;
        post.like_count = likes;
        Some(likes)
    }
}

/// A next `updated_at` that is strictly later than `previous`, even when the
/// clock has not advanced between two writes.
fn touch(previous: Timestamp) -> Timestamp {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + chrono::Duration::microseconds(1)
    }
}

/// [`ContentStore`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `seed` through the regular create paths.
    pub async fn seeded(seed: SeedData) -> StoreResult<Self> {
        let store = Self::new();
        for book in &seed.books {
            store.create_book(book).await?;
        }
        for post in &seed.blog_posts {
            store.create_blog_post(post).await?;
        }
        if let Some(author) = &seed.author {
            store.upsert_author(author).await?;
        }
        tracing::debug!(
            books = seed.books.len(),
            blog_posts = seed.blog_posts.len(),
            author = seed.author.is_some(),
            "Seeded memory store",
        );
        Ok(store)
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    // --- Books ---

    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        let state = self.state.read().await;
        let mut books: Vec<Book> = state.books.values().cloned().collect();
        books.sort_by(|a, b| {
            a.book_number
                .cmp(&b.book_number)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(books)
    }

    async fn find_book(&self, id: &str) -> StoreResult<Option<Book>> {
        Ok(self.state.read().await.books.get(id).cloned())
    }

    async fn create_book(&self, input: &CreateBook) -> StoreResult<Book> {
        let mut state = self.state.write().await;
        if state.books.contains_key(&input.id) {
            return Err(StoreError::Conflict(format!(
                "Book with id {} already exists",
                input.id
            )));
        }
        let now = Utc::now();
        let book = Book {
            id: input.id.clone(),
            title: input.title.clone(),
            series: input.series.clone(),
            book_number: input.book_number,
            year: input.year,
            description: input.description.clone(),
            long_description: input.long_description.clone(),
            cover_image: input.cover_image.clone(),
            featured: input.featured,
            characters: input.characters.clone(),
            themes: input.themes.clone(),
            quotes: input.quotes.clone(),
            genre: input.genre.clone(),
            awards: input.awards.clone(),
            author_name: input.author_name.clone(),
            created_at: now,
            updated_at: now,
        };
        state.books.insert(book.id.clone(), book.clone());
        Ok(book)
    }

    async fn update_book(&self, id: &str, input: &UpdateBook) -> StoreResult<Option<Book>> {
        let mut state = self.state.write().await;
        let Some(book) = state.books.get_mut(id) else {
            return Ok(None);
        };
        if let Some(v) = &input.title {
            book.title = v.clone();
        }
        if let Some(v) = &input.series {
            book.series = v.clone();
        }
        if let Some(v) = input.book_number {
            book.book_number = v;
        }
        if let Some(v) = input.year {
            book.year = v;
        }
        if let Some(v) = &input.description {
            book.description = v.clone();
        }
        if let Some(v) = &input.long_description {
            book.long_description = v.clone();
        }
        if let Some(v) = &input.cover_image {
            book.cover_image = v.clone();
        }
        if let Some(v) = input.featured {
            book.featured = v;
        }
        if let Some(v) = &input.characters {
            book.characters = v.clone();
        }
        if let Some(v) = &input.themes {
            book.themes = v.clone();
        }
        if let Some(v) = &input.quotes {
            book.quotes = v.clone();
        }
        if let Some(v) = &input.genre {
            book.genre = v.clone();
        }
        if let Some(v) = &input.awards {
            book.awards = v.clone();
        }
        if let Some(v) = &input.author_name {
            book.author_name = v.clone();
        }
        book.updated_at = touch(book.updated_at);
        Ok(Some(book.clone()))
    }

    async fn replace_book(&self, replacement: &Book) -> StoreResult<Option<Book>> {
        let mut state = self.state.write().await;
        let Some(book) = state.books.get_mut(&replacement.id) else {
            return Ok(None);
        };
        let created_at = book.created_at;
        let updated_at = touch(book.updated_at);
        *book = Book {
            created_at,
            updated_at,
            ..replacement.clone()
        };
        Ok(Some(book.clone()))
    }

    async fn restore_book(&self, book: &Book) -> StoreResult<Book> {
        let mut state = self.state.write().await;
        if state.books.contains_key(&book.id) {
            return Err(StoreError::Conflict(format!(
                "Book with id {} already exists",
                book.id
            )));
        }
        let restored = Book {
            updated_at: touch(book.updated_at),
            ..book.clone()
        };
        state.books.insert(restored.id.clone(), restored.clone());
        Ok(restored)
    }

    async fn delete_book(&self, id: &str) -> StoreResult<bool> {
        Ok(self.state.write().await.books.remove(id).is_some())
    }

    // --- Blog posts ---

    async fn list_blog_posts(&self, published_only: bool) -> StoreResult<Vec<BlogPost>> {
        let state = self.state.read().await;
        let mut posts: Vec<BlogPost> = state
            .blog_posts
            .values()
            .filter(|p| !published_only || p.published)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn find_blog_post(&self, id: DbId) -> StoreResult<Option<BlogPost>> {
        Ok(self.state.read().await.blog_posts.get(&id).cloned())
    }

    async fn create_blog_post(&self, input: &CreateBlogPost) -> StoreResult<BlogPost> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let post = BlogPost {
            id: state.next_post_id(),
            title: input.title.clone(),
            excerpt: input.excerpt.clone(),
            content: input.content.clone(),
            date: input.date,
            read_time: input.read_time.clone(),
            category: input.category.clone(),
            featured: input.featured,
            tags: input.tags.clone(),
            author_name: input.author_name.clone(),
            published: input.published,
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.blog_posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_blog_post(
        &self,
        id: DbId,
        input: &UpdateBlogPost,
    ) -> StoreResult<Option<BlogPost>> {
        let mut state = self.state.write().await;
        let Some(post) = state.blog_posts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(v) = &input.title {
            post.title = v.clone();
        }
        if let Some(v) = &input.excerpt {
            post.excerpt = v.clone();
        }
        if let Some(v) = &input.content {
            post.content = v.clone();
        }
        if let Some(v) = input.date {
            post.date = v;
        }
        if let Some(v) = &input.read_time {
            post.read_time = v.clone();
        }
        if let Some(v) = &input.category {
            post.category = v.clone();
        }
        if let Some(v) = input.featured {
            post.featured = v;
        }
        if let Some(v) = &input.tags {
            post.tags = v.clone();
        }
        if let Some(v) = &input.author_name {
            post.author_name = v.clone();
        }
        if let Some(v) = input.published {
            post.published = v;
        }
        post.updated_at = touch(post.updated_at);
        Ok(Some(post.clone()))
    }

    async fn replace_blog_post(&self, replacement: &BlogPost) -> StoreResult<Option<BlogPost>> {
        let mut state = self.state.write().await;
        let Some(post) = state.blog_posts.get_mut(&replacement.id) else {
            return Ok(None);
        };
        *post = BlogPost {
            view_count: post.view_count,
            like_count: post.like_count,
            comment_count: post.comment_count,
            created_at: post.created_at,
            updated_at: touch(post.updated_at),
            ..replacement.clone()
        };
        Ok(Some(post.clone()))
    }

    async fn restore_blog_post(&self, post: &BlogPost) -> StoreResult<BlogPost> {
        let mut state = self.state.write().await;
        if state.blog_posts.contains_key(&post.id) {
            return Err(StoreError::Conflict(format!(
                "BlogPost with id {} already exists",
                post.id
            )));
        }
        let restored = BlogPost {
            updated_at: touch(post.updated_at),
            ..post.clone()
        };
        state.last_post_id = state.last_post_id.max(restored.id);
        state.blog_posts.insert(restored.id, restored.clone());
        // Likes and comments went with the cascade; the snapshot's counters are stale.
        state.refresh_like_count(restored.id);
        state.refresh_comment_count(restored.id);
        Ok(state.blog_posts.get(&restored.id).cloned().unwrap_or(restored))
    }

    async fn delete_blog_post(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.blog_posts.remove(&id).is_none() {
            return Ok(false);
        }
        // Mirror the ON DELETE CASCADE of the relational schema.
        state.comments.retain(|_, c| c.blog_post_id != id);
        state.likes.retain(|(post_id, _)| *post_id != id);
        Ok(true)
    }

    async fn record_view(&self, id: DbId) -> StoreResult<Option<i32>> {
        let mut state = self.state.write().await;
        Ok(state.blog_posts.get_mut(&id).map(|post| {
            post.view_count += 1;
            post.view_count
        }))
    }

    async fn like_blog_post(
        &self,
        id: DbId,
        visitor_id: &str,
    ) -> StoreResult<Option<LikeSummary>> {
        let mut state = self.state.write().await;
        if !state.blog_posts.contains_key(&id) {
            return Ok(None);
        }
        state.likes.insert((id, visitor_id.to_string()));
        Ok(state.refresh_like_count(id).map(|like_count| LikeSummary {
            blog_post_id: id,
            like_count,
        }))
    }

    // --- Author ---

    async fn find_author(&self) -> StoreResult<Option<Author>> {
        Ok(self.state.read().await.author.clone())
    }

    async fn upsert_author(&self, input: &UpsertAuthor) -> StoreResult<Author> {
        let mut state = self.state.write().await;
        let author = match state.author.take() {
            Some(existing) => Author {
                name: input.name.clone(),
                bio: input.bio.clone().or(existing.bio),
                long_bio: input.long_bio.clone().or(existing.long_bio),
                photo: input.photo.clone().or(existing.photo),
                email: input.email.clone().or(existing.email),
                website: input.website.clone().or(existing.website),
                location: input.location.clone().or(existing.location),
                social_media: input.social_media.clone().unwrap_or(existing.social_media),
                stats: input.stats.clone().unwrap_or(existing.stats),
                updated_at: touch(existing.updated_at),
                ..existing
            },
            None => {
                let now = Utc::now();
                Author {
                    id: 1,
                    name: input.name.clone(),
                    bio: input.bio.clone(),
                    long_bio: input.long_bio.clone(),
                    photo: input.photo.clone(),
                    email: input.email.clone(),
                    website: input.website.clone(),
                    location: input.location.clone(),
                    social_media: input
                        .social_media
                        .clone()
                        .unwrap_or_else(|| serde_json::json!({})),
                    stats: input.stats.clone().unwrap_or_else(|| serde_json::json!({})),
                    created_at: now,
                    updated_at: now,
                }
            }
        };
        state.author = Some(author.clone());
        Ok(author)
    }

    // --- Comments ---

    async fn list_approved_comments(&self, blog_post_id: DbId) -> StoreResult<Vec<Comment>> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| {
                c.blog_post_id == blog_post_id && c.status == CommentStatus::Approved.as_str()
            })
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn list_comments(&self, status: Option<CommentStatus>) -> StoreResult<Vec<Comment>> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| status.is_none_or(|s| c.status == s.as_str()))
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(comments)
    }

    async fn create_comment(
        &self,
        blog_post_id: DbId,
        input: &CreateComment,
    ) -> StoreResult<Comment> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let comment = Comment {
            id: state.next_comment_id(),
            blog_post_id,
            author_name: input.author_name.clone(),
            author_email: input.author_email.clone(),
            content: input.content.clone(),
            status: CommentStatus::Pending.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update_comment_status(
        &self,
        id: DbId,
        status: CommentStatus,
    ) -> StoreResult<Option<Comment>> {
        let mut state = self.state.write().await;
        let Some(comment) = state.comments.get_mut(&id) else {
            return Ok(None);
        };
        comment.status = status.as_str().to_string();
        comment.updated_at = touch(comment.updated_at);
        let updated = comment.clone();
        state.refresh_comment_count(updated.blog_post_id);
        Ok(Some(updated))
    }

    async fn delete_comment(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.comments.remove(&id) {
            Some(comment) => {
                state.refresh_comment_count(comment.blog_post_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // --- Edit history ---

    async fn append_edit(&self, input: &CreateEditEntry) -> StoreResult<EditEntry> {
        let mut state = self.state.write().await;
        let entry = EditEntry {
            id: state.next_history_id(),
            table_name: input.table_name.clone(),
            record_id: input.record_id.clone(),
            action: input.action.as_str().to_string(),
            old_data: input.old_data.clone(),
            new_data: input.new_data.clone(),
            description: input.description.clone(),
            created_at: Utc::now(),
        };
        state.history.push(entry.clone());
        Ok(entry)
    }

    async fn latest_edit(
        &self,
        table_name: &str,
        record_id: &str,
    ) -> StoreResult<Option<EditEntry>> {
        let state = self.state.read().await;
        Ok(state
            .history
            .iter()
            .rev()
            .find(|e| e.table_name == table_name && e.record_id == record_id)
            .cloned())
    }

    async fn record_history(
        &self,
        table_name: &str,
        record_id: &str,
    ) -> StoreResult<Vec<EditEntry>> {
        let state = self.state.read().await;
        Ok(state
            .history
            .iter()
            .rev()
            .filter(|e| e.table_name == table_name && e.record_id == record_id)
            .cloned()
            .collect())
    }

    async fn recent_history(&self, limit: i64) -> StoreResult<Vec<EditEntry>> {
        let state = self.state.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(state.history.iter().rev().take(limit).cloned().collect())
    }

    async fn clear_history(&self, table_name: Option<&str>) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        let before = state.history.len();
        match table_name {
            Some(table) => state.history.retain(|e| e.table_name != table),
            None => state.history.clear(),
        }
        Ok((before - state.history.len()) as u64)
    }
}
