//! Repository for the append-only `edit_history` table.

use sqlx::PgPool;

use crate::models::edit_history::{CreateEditEntry, EditEntry};

/// Column list for `edit_history` queries.
const COLUMNS: &str = "\
    id, table_name, record_id, action, old_data, new_data, description, created_at";

/// Provides append and query operations for the edit ledger.
///
/// Entries are ordered by `id` rather than `created_at` so that entries
/// written within the same clock tick keep their insertion order.
pub struct EditHistoryRepo;

impl EditHistoryRepo {
    /// Append a new entry.
    pub async fn create(pool: &PgPool, input: &CreateEditEntry) -> Result<EditEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO edit_history \
                 (table_name, record_id, action, old_data, new_data, description) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EditEntry>(&query)
            .bind(&input.table_name)
            .bind(&input.record_id)
            .bind(input.action.as_str())
            .bind(&input.old_data)
            .bind(&input.new_data)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Most recent entry for a record.
    pub async fn find_latest(
        pool: &PgPool,
        table_name: &str,
        record_id: &str,
    ) -> Result<Option<EditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM edit_history \
             WHERE table_name = $1 AND record_id = $2 \
             ORDER BY id DESC LIMIT 1"
        );
        sqlx::query_as::<_, EditEntry>(&query)
            .bind(table_name)
            .bind(record_id)
            .fetch_optional(pool)
            .await
    }

    /// Full history of a record, newest first.
    pub async fn list_for_record(
        pool: &PgPool,
        table_name: &str,
        record_id: &str,
    ) -> Result<Vec<EditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM edit_history \
             WHERE table_name = $1 AND record_id = $2 \
             ORDER BY id DESC"
        );
        sqlx::query_as::<_, EditEntry>(&query)
            .bind(table_name)
            .bind(record_id)
            .fetch_all(pool)
            .await
    }

    /// Most recent entries across all tables, newest first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<EditEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM edit_history ORDER BY id DESC LIMIT $1");
        sqlx::query_as::<_, EditEntry>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Remove history, either for one table or entirely. Returns the number
    /// of entries removed.
    pub async fn clear(pool: &PgPool, table_name: Option<&str>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM edit_history WHERE ($1::TEXT IS NULL OR table_name = $1)",
        )
        .bind(table_name)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
