//! Blog post models and DTOs.

use chrono::NaiveDate;
use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `blog_posts` table.
///
/// `view_count`, `like_count` and `comment_count` are denormalized
/// summaries; `blog_likes` and approved `blog_comments` are authoritative.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: DbId,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub date: NaiveDate,
    pub read_time: Option<String>,
    pub category: Option<String>,
    pub featured: bool,
    pub tags: Vec<String>,
    pub author_name: Option<String>,
    pub published: bool,
    pub view_count: i32,
    pub like_count: i32,
    pub comment_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new blog post. Posts are drafts unless `published`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBlogPost {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub date: NaiveDate,
    pub read_time: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author_name: Option<String>,
    #[serde(default)]
    pub published: bool,
}

/// DTO for partially updating a blog post. Absent fields keep their value;
/// nullable columns are cleared by an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBlogPost {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::clearable")]
    pub excerpt: Option<Option<String>>,
    pub content: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "super::clearable")]
    pub read_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::clearable")]
    pub category: Option<Option<String>>,
    pub featured: Option<bool>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "super::clearable")]
    pub author_name: Option<Option<String>>,
    pub published: Option<bool>,
}
