//! Edit history ledger rules.
//!
//! Each mutation of a tracked table is recorded as an entry holding the row
//! before and after the change. Undo replays the newest entry of a record in
//! reverse and records a compensating entry, so calling undo twice returns the
//! record to where it started.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Default number of entries returned by the recent-history listing.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Upper bound for the recent-history listing.
pub const MAX_HISTORY_LIMIT: i64 = 500;

/// Prefix put in front of the original description on compensating entries.
pub const UNDO_DESCRIPTION_PREFIX: &str = "Undo: ";

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The kind of mutation an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    Create,
    Update,
    Delete,
}

impl EditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            EditAction::Create => "create",
            EditAction::Update => "update",
            EditAction::Delete => "delete",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "create" => Ok(EditAction::Create),
            "update" => Ok(EditAction::Update),
            "delete" => Ok(EditAction::Delete),
            other => Err(CoreError::Validation(format!(
                "Invalid edit action '{other}'. Must be one of: create, update, delete"
            ))),
        }
    }
}

impl std::fmt::Display for EditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tracked tables
// ---------------------------------------------------------------------------

/// Tables whose mutations are recorded in the ledger and can be undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedTable {
    Books,
    BlogPosts,
}

/// Table names accepted by [`TrackedTable::parse`].
pub const TRACKED_TABLES: &[&str] = &["books", "blog_posts"];

impl TrackedTable {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackedTable::Books => "books",
            TrackedTable::BlogPosts => "blog_posts",
        }
    }

    /// Human-readable entity name used in error messages.
    pub fn entity_name(self) -> &'static str {
        match self {
            TrackedTable::Books => "Book",
            TrackedTable::BlogPosts => "BlogPost",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "books" => Ok(TrackedTable::Books),
            "blog_posts" => Ok(TrackedTable::BlogPosts),
            other => Err(CoreError::Validation(format!(
                "Invalid table '{other}'. Must be one of: {}",
                TRACKED_TABLES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for TrackedTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Snapshot invariant
// ---------------------------------------------------------------------------

/// Treat a JSON `null` snapshot the same as a missing one.
pub fn normalize_snapshot(snapshot: Option<Value>) -> Option<Value> {
    snapshot.filter(|v| !v.is_null())
}

/// Check the before/after snapshots against the action.
///
/// `create` carries only `new_data`, `delete` only `old_data`, and `update`
/// carries both.
pub fn validate_snapshots(
    action: EditAction,
    old_data: Option<&Value>,
    new_data: Option<&Value>,
) -> Result<(), CoreError> {
    let has_old = old_data.is_some_and(|v| !v.is_null());
    let has_new = new_data.is_some_and(|v| !v.is_null());

    let ok = match action {
        EditAction::Create => !has_old && has_new,
        EditAction::Update => has_old && has_new,
        EditAction::Delete => has_old && !has_new,
    };

    if ok {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Snapshots do not match a '{action}' entry (old_data present: {has_old}, \
             new_data present: {has_new})"
        )))
    }
}

/// Clamp a requested history limit into `1..=MAX_HISTORY_LIMIT`.
pub fn clamp_history_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

// ---------------------------------------------------------------------------
// Undo planning
// ---------------------------------------------------------------------------

/// The write needed to put a record back into its previous state.
#[derive(Debug, Clone, PartialEq)]
pub enum Reversal {
    /// The entry created the record: remove it.
    DeleteCurrent,
    /// The entry updated the record: overwrite it with the old snapshot.
    Overwrite(Value),
    /// The entry deleted the record: insert the old snapshot again.
    Reinsert(Value),
}

/// The ledger entry written after a successful undo.
#[derive(Debug, Clone, PartialEq)]
pub struct CompensatingEdit {
    pub action: EditAction,
    pub old_data: Option<Value>,
    pub new_data: Option<Value>,
    pub description: String,
}

/// Everything needed to undo one ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoPlan {
    pub reversal: Reversal,
    pub compensating: CompensatingEdit,
}

/// Build the undo plan for the newest entry of a record.
///
/// The compensating entry swaps the snapshots of the undone entry. Its action
/// is whatever keeps the snapshot invariant: undoing a create records a
/// delete, undoing a delete records a create, undoing an update records an
/// update.
pub fn plan_undo(
    action: EditAction,
    old_data: Option<Value>,
    new_data: Option<Value>,
    description: &str,
) -> Result<UndoPlan, CoreError> {
    let old_data = normalize_snapshot(old_data);
    let new_data = normalize_snapshot(new_data);
    validate_snapshots(action, old_data.as_ref(), new_data.as_ref())?;

    let (reversal, compensating_action) = match (action, &old_data) {
        (EditAction::Create, _) => (Reversal::DeleteCurrent, EditAction::Delete),
        (EditAction::Update, Some(old)) => (Reversal::Overwrite(old.clone()), EditAction::Update),
        (EditAction::Delete, Some(old)) => (Reversal::Reinsert(old.clone()), EditAction::Create),
        // validate_snapshots guarantees old_data for update and delete.
        (_, None) => {
            return Err(CoreError::Internal(
                "Undo plan requires an old snapshot".to_string(),
            ))
        }
    };

    Ok(UndoPlan {
        reversal,
        compensating: CompensatingEdit {
            action: compensating_action,
            old_data: new_data,
            new_data: old_data,
            description: undo_description(description),
        },
    })
}

/// Description recorded on a compensating entry.
pub fn undo_description(original: &str) -> String {
    format!("{UNDO_DESCRIPTION_PREFIX}{original}")
}
