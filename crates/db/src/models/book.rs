//! Book models and DTOs.

use quill_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `books` table.
///
/// Also deserializable so ledger snapshots and seed files can be turned
/// back into rows.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub series: Option<String>,
    pub book_number: i32,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub cover_image: Option<String>,
    pub featured: bool,
    pub characters: Vec<String>,
    pub themes: Vec<String>,
    pub quotes: Vec<String>,
    pub genre: Vec<String>,
    pub awards: Vec<String>,
    pub author_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new book. The slug `id` is chosen by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBook {
    pub id: String,
    pub title: String,
    pub series: Option<String>,
    pub book_number: i32,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub quotes: Vec<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub awards: Vec<String>,
    pub author_name: Option<String>,
}

/// DTO for partially updating a book. Absent fields keep their value;
/// nullable columns are cleared by an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBook {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::clearable")]
    pub series: Option<Option<String>>,
    pub book_number: Option<i32>,
    #[serde(default, deserialize_with = "super::clearable")]
    pub year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "super::clearable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::clearable")]
    pub long_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::clearable")]
    pub cover_image: Option<Option<String>>,
    pub featured: Option<bool>,
    pub characters: Option<Vec<String>>,
    pub themes: Option<Vec<String>>,
    pub quotes: Option<Vec<String>>,
    pub genre: Option<Vec<String>>,
    pub awards: Option<Vec<String>>,
    #[serde(default, deserialize_with = "super::clearable")]
    pub author_name: Option<Option<String>>,
}
