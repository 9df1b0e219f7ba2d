//! Author profile model. The `author` table holds at most one row.

use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The author profile row. `social_media` and `stats` are free-form JSON
/// objects (links keyed by network, headline numbers keyed by label).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Author {
    pub id: DbId,
    pub name: String,
    pub bio: Option<String>,
    pub long_bio: Option<String>,
    pub photo: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub social_media: serde_json::Value,
    pub stats: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `PUT /author`. Updates the existing profile or creates it.
///
/// On update, absent optional fields keep their stored value.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpsertAuthor {
    pub name: String,
    pub bio: Option<String>,
    pub long_bio: Option<String>,
    pub photo: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub social_media: Option<serde_json::Value>,
    pub stats: Option<serde_json::Value>,
}
