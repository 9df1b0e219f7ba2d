//! Blog post like DTOs. Likes are unique per (post, visitor).

use quill_core::types::DbId;
use serde::{Deserialize, Serialize};

/// DTO for `POST /blog-posts/{id}/like`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateLike {
    pub visitor_id: String,
}

/// Like total for a post after recording a like.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikeSummary {
    pub blog_post_id: DbId,
    pub like_count: i32,
}
