//! Edit history service.
//!
//! Handlers call [`log_edit`] after every successful mutation of a tracked
//! table. Ledger writes are best effort: a failure is logged at `warn` and
//! never reaches the caller, so the mutation it describes still succeeds.
//!
//! [`undo_last_edit`] reverses the newest entry of one record using the
//! rules in [`quill_core::edit_history::plan_undo`].

use quill_core::edit_history::{
    plan_undo, validate_snapshots, EditAction, Reversal, TrackedTable,
};
use quill_core::error::CoreError;
use quill_core::types::DbId;
use quill_db::models::blog_post::BlogPost;
use quill_db::models::book::Book;
use quill_db::models::edit_history::{CreateEditEntry, EditEntry};
use quill_db::{ContentStore, StoreError};
use serde::Serialize;
use serde_json::Value;

/// Why a ledger write or an undo did not go through. Never surfaced over
/// HTTP.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Snapshot could not be converted: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Record id '{0}' is not valid for this table")]
    InvalidRecordId(String),

    #[error("Record {table}/{record_id} no longer matches the entry being undone")]
    RecordMissing { table: TrackedTable, record_id: String },
}

/// Record one mutation. Errors are logged and swallowed.
pub async fn log_edit<T: Serialize + Sync>(
    store: &dyn ContentStore,
    table: TrackedTable,
    record_id: &str,
    action: EditAction,
    old: Option<&T>,
    new: Option<&T>,
    description: &str,
) {
    let (old_data, new_data) = match (snapshot(old), snapshot(new)) {
        (Ok(old_data), Ok(new_data)) => (old_data, new_data),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(%table, record_id, %action, error = %e, "Failed to snapshot edit");
            return;
        }
    };

    append_or_warn(
        store,
        CreateEditEntry {
            table_name: table.as_str().to_string(),
            record_id: record_id.to_string(),
            action,
            old_data,
            new_data,
            description: description.to_string(),
        },
    )
    .await;
}

fn snapshot<T: Serialize>(row: Option<&T>) -> Result<Option<Value>, serde_json::Error> {
    row.map(serde_json::to_value).transpose()
}

/// Append an entry after checking the snapshot invariant.
async fn append(
    store: &dyn ContentStore,
    entry: &CreateEditEntry,
) -> Result<EditEntry, LedgerError> {
    validate_snapshots(entry.action, entry.old_data.as_ref(), entry.new_data.as_ref())?;
    Ok(store.append_edit(entry).await?)
}

async fn append_or_warn(store: &dyn ContentStore, entry: CreateEditEntry) {
    match append(store, &entry).await {
        Ok(saved) => tracing::debug!(
            entry_id = saved.id,
            table = %saved.table_name,
            record_id = %saved.record_id,
            action = %saved.action,
            "Edit recorded",
        ),
        Err(e) => tracing::warn!(
            table = %entry.table_name,
            record_id = %entry.record_id,
            action = %entry.action,
            error = %e,
            "Failed to record edit",
        ),
    }
}

/// Undo the newest edit of `record_id` in `table`.
///
/// Returns `false` when there is nothing to undo or the reversal could not be
/// applied; the reason is logged. On success a compensating entry is
/// appended, so a second call re-applies the undone change.
pub async fn undo_last_edit(
    store: &dyn ContentStore,
    table: TrackedTable,
    record_id: &str,
) -> bool {
    match try_undo(store, table, record_id).await {
        Ok(Some(entry_id)) => {
            tracing::info!(%table, record_id, entry_id, "Edit undone");
            true
        }
        Ok(None) => {
            tracing::debug!(%table, record_id, "No edit history to undo");
            false
        }
        Err(e) => {
            tracing::warn!(%table, record_id, error = %e, "Undo failed");
            false
        }
    }
}

/// Returns the id of the undone entry, or `None` when the record has no
/// history.
async fn try_undo(
    store: &dyn ContentStore,
    table: TrackedTable,
    record_id: &str,
) -> Result<Option<DbId>, LedgerError> {
    let Some(entry) = store.latest_edit(table.as_str(), record_id).await? else {
        return Ok(None);
    };

    let action = EditAction::parse(&entry.action)?;
    let plan = plan_undo(action, entry.old_data, entry.new_data, &entry.description)?;

    match table {
        TrackedTable::Books => reverse_book(store, record_id, plan.reversal).await?,
        TrackedTable::BlogPosts => reverse_blog_post(store, record_id, plan.reversal).await?,
    }

    let compensating = plan.compensating;
    append_or_warn(
        store,
        CreateEditEntry {
            table_name: table.as_str().to_string(),
            record_id: record_id.to_string(),
            action: compensating.action,
            old_data: compensating.old_data,
            new_data: compensating.new_data,
            description: compensating.description,
        },
    )
    .await;

    Ok(Some(entry.id))
}

async fn reverse_book(
    store: &dyn ContentStore,
    record_id: &str,
    reversal: Reversal,
) -> Result<(), LedgerError> {
    let missing = || LedgerError::RecordMissing {
        table: TrackedTable::Books,
        record_id: record_id.to_string(),
    };

    match reversal {
        Reversal::DeleteCurrent => {
            if !store.delete_book(record_id).await? {
                return Err(missing());
            }
        }
        Reversal::Overwrite(snapshot) => {
            let book = decode_book(record_id, snapshot)?;
            store.replace_book(&book).await?.ok_or_else(missing)?;
        }
        Reversal::Reinsert(snapshot) => {
            let book = decode_book(record_id, snapshot)?;
            store.restore_book(&book).await?;
        }
    }
    Ok(())
}

async fn reverse_blog_post(
    store: &dyn ContentStore,
    record_id: &str,
    reversal: Reversal,
) -> Result<(), LedgerError> {
    let id: DbId = record_id
        .parse()
        .map_err(|_| LedgerError::InvalidRecordId(record_id.to_string()))?;
    let missing = || LedgerError::RecordMissing {
        table: TrackedTable::BlogPosts,
        record_id: record_id.to_string(),
    };

    match reversal {
        Reversal::DeleteCurrent => {
            if !store.delete_blog_post(id).await? {
                return Err(missing());
            }
        }
        Reversal::Overwrite(snapshot) => {
            let post = decode_blog_post(id, snapshot)?;
            store.replace_blog_post(&post).await?.ok_or_else(missing)?;
        }
        Reversal::Reinsert(snapshot) => {
            let post = decode_blog_post(id, snapshot)?;
            store.restore_blog_post(&post).await?;
        }
    }
    Ok(())
}

/// The path's record id wins over whatever id the snapshot carries.
fn decode_book(record_id: &str, snapshot: Value) -> Result<Book, LedgerError> {
    let book: Book = serde_json::from_value(snapshot)?;
    Ok(Book {
        id: record_id.to_string(),
        ..book
    })
}

fn decode_blog_post(id: DbId, snapshot: Value) -> Result<BlogPost, LedgerError> {
    let post: BlogPost = serde_json::from_value(snapshot)?;
    Ok(BlogPost { id, ..post })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use quill_db::models::blog_post::{CreateBlogPost, UpdateBlogPost};
    use quill_db::models::book::{CreateBook, UpdateBook};
    use quill_db::MemoryStore;
    use serde_json::json;

    use super::*;

    fn new_book(id: &str) -> CreateBook {
        serde_json::from_value(json!({"id": id, "title": "Original", "book_number": 1}))
            .expect("valid book")
    }

    fn new_post() -> CreateBlogPost {
        CreateBlogPost {
            title: "First post".to_string(),
            excerpt: None,
            content: "Hello".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
            read_time: None,
            category: None,
            featured: false,
            tags: vec!["news".to_string()],
            author_name: None,
            published: true,
        }
    }

    async fn create_logged_book(store: &MemoryStore, id: &str) -> Book {
        let book = store.create_book(&new_book(id)).await.unwrap();
        log_edit(
            store,
            TrackedTable::Books,
            id,
            EditAction::Create,
            None,
            Some(&book),
            "Created",
        )
        .await;
        book
    }

    #[tokio::test]
    async fn test_undo_without_history_returns_false() {
        let store = MemoryStore::new();
        assert!(!undo_last_edit(&store, TrackedTable::Books, "missing").await);
    }

    #[tokio::test]
    async fn test_undo_create_removes_record() {
        let store = MemoryStore::new();
        create_logged_book(&store, "b1").await;

        assert!(undo_last_edit(&store, TrackedTable::Books, "b1").await);
        assert!(store.find_book("b1").await.unwrap().is_none());

        let history = store.record_history("books", "b1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, "delete");
        assert_eq!(history[0].description, "Undo: Created");
    }

    #[tokio::test]
    async fn test_undo_update_restores_previous_content() {
        let store = MemoryStore::new();
        let before = create_logged_book(&store, "b1").await;

        let patch = UpdateBook {
            title: Some("Changed".to_string()),
            ..Default::default()
        };
        let after = store.update_book("b1", &patch).await.unwrap().unwrap();
        log_edit(
            &store,
            TrackedTable::Books,
            "b1",
            EditAction::Update,
            Some(&before),
            Some(&after),
            "Edited",
        )
        .await;

        assert!(undo_last_edit(&store, TrackedTable::Books, "b1").await);
        let restored = store.find_book("b1").await.unwrap().unwrap();
        assert_eq!(restored.title, "Original");

        // A second undo re-applies the change.
        assert!(undo_last_edit(&store, TrackedTable::Books, "b1").await);
        let redone = store.find_book("b1").await.unwrap().unwrap();
        assert_eq!(redone.title, "Changed");
    }

    #[tokio::test]
    async fn test_undo_delete_reinserts_blog_post_with_same_id() {
        let store = MemoryStore::new();
        let post = store.create_blog_post(&new_post()).await.unwrap();
        let record_id = post.id.to_string();
        store.delete_blog_post(post.id).await.unwrap();
        log_edit(
            &store,
            TrackedTable::BlogPosts,
            &record_id,
            EditAction::Delete,
            Some(&post),
            None,
            "Deleted",
        )
        .await;

        assert!(undo_last_edit(&store, TrackedTable::BlogPosts, &record_id).await);
        let restored = store.find_blog_post(post.id).await.unwrap().unwrap();
        assert_eq!(restored.title, post.title);
        assert_eq!(restored.tags, post.tags);
        assert_eq!(restored.created_at, post.created_at);

        let latest = store
            .latest_edit("blog_posts", &record_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.action, "create");
        assert!(latest.old_data.is_none());
        assert!(latest.new_data.is_some());
    }

    #[tokio::test]
    async fn test_undo_update_of_deleted_post_fails() {
        let store = MemoryStore::new();
        let post = store.create_blog_post(&new_post()).await.unwrap();
        let patch = UpdateBlogPost {
            title: Some("New".to_string()),
            ..Default::default()
        };
        let updated = store.update_blog_post(post.id, &patch).await.unwrap().unwrap();
        let record_id = post.id.to_string();
        log_edit(
            &store,
            TrackedTable::BlogPosts,
            &record_id,
            EditAction::Update,
            Some(&post),
            Some(&updated),
            "Edited",
        )
        .await;
        store.delete_blog_post(post.id).await.unwrap();

        assert!(!undo_last_edit(&store, TrackedTable::BlogPosts, &record_id).await);
        let history = store.record_history("blog_posts", &record_id).await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_snapshot_fails_undo() {
        let store = MemoryStore::new();
        store
            .append_edit(&CreateEditEntry {
                table_name: "books".to_string(),
                record_id: "b1".to_string(),
                action: EditAction::Delete,
                old_data: Some(json!({"title": "no other fields"})),
                new_data: None,
                description: "Deleted".to_string(),
            })
            .await
            .unwrap();

        assert!(!undo_last_edit(&store, TrackedTable::Books, "b1").await);
        assert!(store.find_book("b1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_snapshots_are_not_recorded() {
        let store = MemoryStore::new();
        let book = store.create_book(&new_book("b1")).await.unwrap();

        // A create carrying an old snapshot, and an update carrying none.
        let books = TrackedTable::Books;
        log_edit(&store, books, "b1", EditAction::Create, Some(&book), Some(&book), "Bad").await;
        log_edit::<Book>(&store, books, "b1", EditAction::Update, None, None, "Bad").await;

        assert!(store.record_history("books", "b1").await.unwrap().is_empty());
    }
}
