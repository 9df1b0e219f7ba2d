//! Query parameter types shared by handler modules.

use serde::Deserialize;

/// `?limit=` for the recent-history listing. Clamped by
/// [`clamp_history_limit`](quill_core::edit_history::clamp_history_limit).
#[derive(Debug, Deserialize)]
pub struct HistoryLimitParams {
    pub limit: Option<i64>,
}

/// `?table=` for clearing history. Absent means every table.
#[derive(Debug, Deserialize)]
pub struct ClearHistoryParams {
    pub table: Option<String>,
}

/// `?status=` for the moderation queue.
#[derive(Debug, Deserialize)]
pub struct CommentStatusParams {
    pub status: Option<String>,
}
