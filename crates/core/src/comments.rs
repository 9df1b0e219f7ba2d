//! Reader comment moderation states.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Moderation state of a reader comment. New comments start as `Pending`
/// and only `Approved` comments are shown publicly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Pending,
    Approved,
    Rejected,
}

/// Status names accepted by [`CommentStatus::parse`].
pub const VALID_COMMENT_STATUSES: &[&str] = &["pending", "approved", "rejected"];

impl CommentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentStatus::Pending => "pending",
            CommentStatus::Approved => "approved",
            CommentStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "pending" => Ok(CommentStatus::Pending),
            "approved" => Ok(CommentStatus::Approved),
            "rejected" => Ok(CommentStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid comment status '{other}'. Must be one of: {}",
                VALID_COMMENT_STATUSES.join(", ")
            ))),
        }
    }

    /// Whether comments in this state appear on the public blog.
    pub fn is_public(self) -> bool {
        self == CommentStatus::Approved
    }
}

impl std::fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
