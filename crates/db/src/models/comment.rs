//! Reader comment models and DTOs.

use quill_core::comments::CommentStatus;
use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `blog_comments` table.
///
/// `status` holds one of the [`CommentStatus`] names.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: DbId,
    pub blog_post_id: DbId,
    pub author_name: String,
    pub author_email: Option<String>,
    pub content: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for a reader submitting a comment. The post id comes from the path.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateComment {
    pub author_name: String,
    pub author_email: Option<String>,
    pub content: String,
}

/// DTO for `PUT /comments/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCommentStatus {
    pub status: CommentStatus,
}
