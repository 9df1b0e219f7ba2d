/// Errors returned by [`ContentStore`](crate::store::ContentStore) backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A query failed in the Postgres backend.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored JSON snapshot could not be encoded or decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A write collided with an existing row (duplicate key).
    #[error("Conflict: {0}")]
    Conflict(String),
}
