//! Repository for the singleton `author` table.

use sqlx::PgPool;

use crate::models::author::{Author, UpsertAuthor};

/// Column list for `author` queries.
const COLUMNS: &str = "\
    id, name, bio, long_bio, photo, email, website, location, \
    social_media, stats, created_at, updated_at";

/// Provides read and upsert access to the author profile.
pub struct AuthorRepo;

impl AuthorRepo {
    /// Fetch the author profile, if one has been saved.
    pub async fn find(pool: &PgPool) -> Result<Option<Author>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM author ORDER BY id LIMIT 1");
        sqlx::query_as::<_, Author>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Update the profile row if it exists, otherwise insert it.
    ///
    /// The `uq_author_singleton` index rejects a second row, so two
    /// concurrent first saves resolve to one insert and one conflict.
    pub async fn upsert(pool: &PgPool, input: &UpsertAuthor) -> Result<Author, sqlx::Error> {
        let update = format!(
            "UPDATE author SET \
                 name = $1, \
                 bio = COALESCE($2, bio), \
                 long_bio = COALESCE($3, long_bio), \
                 photo = COALESCE($4, photo), \
                 email = COALESCE($5, email), \
                 website = COALESCE($6, website), \
                 location = COALESCE($7, location), \
                 social_media = COALESCE($8, social_media), \
                 stats = COALESCE($9, stats), \
                 updated_at = NOW() \
             WHERE id = (SELECT id FROM author ORDER BY id LIMIT 1) \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Author>(&update)
            .bind(&input.name)
            .bind(&input.bio)
            .bind(&input.long_bio)
            .bind(&input.photo)
            .bind(&input.email)
            .bind(&input.website)
            .bind(&input.location)
            .bind(&input.social_media)
            .bind(&input.stats)
            .fetch_optional(pool)
            .await?;

        if let Some(author) = updated {
            return Ok(author);
        }

        let insert = format!(
            "INSERT INTO author \
                 (name, bio, long_bio, photo, email, website, location, social_media, stats) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, \
                     COALESCE($8, '{{}}'::jsonb), COALESCE($9, '{{}}'::jsonb)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Author>(&insert)
            .bind(&input.name)
            .bind(&input.bio)
            .bind(&input.long_bio)
            .bind(&input.photo)
            .bind(&input.email)
            .bind(&input.website)
            .bind(&input.location)
            .bind(&input.social_media)
            .bind(&input.stats)
            .fetch_one(pool)
            .await
    }
}
