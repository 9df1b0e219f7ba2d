//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Request DTOs reject unknown fields so malformed payloads fail at the
//! boundary instead of being silently dropped.

pub mod author;
pub mod blog_post;
pub mod book;
pub mod comment;
pub mod edit_history;
pub mod like;

use serde::{Deserialize, Deserializer};

/// `deserialize_with` for clearable fields of update DTOs, paired with
/// `#[serde(default)]`: an absent field stays `None`, `null` becomes
/// `Some(None)` and a value becomes `Some(Some(v))`.
pub(crate) fn clearable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
