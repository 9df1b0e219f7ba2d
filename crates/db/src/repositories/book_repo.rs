//! Repository for the `books` table.

use sqlx::PgPool;

use super::clearable;
use crate::models::book::{Book, CreateBook, UpdateBook};

/// Column list for `books` queries.
const COLUMNS: &str = "\
    id, title, series, book_number, year, description, long_description, \
    cover_image, featured, characters, themes, quotes, genre, awards, \
    author_name, created_at, updated_at";

/// Provides CRUD operations for books.
pub struct BookRepo;

impl BookRepo {
    /// List all books in series order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books ORDER BY book_number ASC, id ASC");
        sqlx::query_as::<_, Book>(&query).fetch_all(pool).await
    }

    /// Find a book by its slug.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new book. Timestamps are assigned by the database.
    pub async fn create(pool: &PgPool, input: &CreateBook) -> Result<Book, sqlx::Error> {
        let query = format!(
            "INSERT INTO books \
                 (id, title, series, book_number, year, description, long_description, \
                  cover_image, featured, characters, themes, quotes, genre, awards, author_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&input.id)
            .bind(&input.title)
            .bind(&input.series)
            .bind(input.book_number)
            .bind(input.year)
            .bind(&input.description)
            .bind(&input.long_description)
            .bind(&input.cover_image)
            .bind(input.featured)
            .bind(&input.characters)
            .bind(&input.themes)
            .bind(&input.quotes)
            .bind(&input.genre)
            .bind(&input.awards)
            .bind(&input.author_name)
            .fetch_one(pool)
            .await
    }

    /// Partially update a book. Absent fields are kept, nullable fields sent
    /// as `null` are cleared, and `updated_at` is always refreshed.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateBook,
    ) -> Result<Option<Book>, sqlx::Error> {
        let (series_set, series) = clearable(&input.series);
        let (year_set, year) = clearable(&input.year);
        let (description_set, description) = clearable(&input.description);
        let (long_description_set, long_description) = clearable(&input.long_description);
        let (cover_image_set, cover_image) = clearable(&input.cover_image);
        let (author_name_set, author_name) = clearable(&input.author_name);

        let query = format!(
            "UPDATE books SET \
                 title = COALESCE($2, title), \
                 series = CASE WHEN $3 THEN $4 ELSE series END, \
                 book_number = COALESCE($5, book_number), \
                 year = CASE WHEN $6 THEN $7 ELSE year END, \
                 description = CASE WHEN $8 THEN $9 ELSE description END, \
                 long_description = CASE WHEN $10 THEN $11 ELSE long_description END, \
                 cover_image = CASE WHEN $12 THEN $13 ELSE cover_image END, \
                 featured = COALESCE($14, featured), \
                 characters = COALESCE($15, characters), \
                 themes = COALESCE($16, themes), \
                 quotes = COALESCE($17, quotes), \
                 genre = COALESCE($18, genre), \
                 awards = COALESCE($19, awards), \
                 author_name = CASE WHEN $20 THEN $21 ELSE author_name END, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(series_set)
            .bind(series)
            .bind(input.book_number)
            .bind(year_set)
            .bind(year)
            .bind(description_set)
            .bind(description)
            .bind(long_description_set)
            .bind(long_description)
            .bind(cover_image_set)
            .bind(cover_image)
            .bind(input.featured)
            .bind(&input.characters)
            .bind(&input.themes)
            .bind(&input.quotes)
            .bind(&input.genre)
            .bind(&input.awards)
            .bind(author_name_set)
            .bind(author_name)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite every content column of `book.id` with the given values,
    /// including setting nullable columns back to NULL.
    pub async fn replace(pool: &PgPool, book: &Book) -> Result<Option<Book>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET \
                 title = $2, series = $3, book_number = $4, year = $5, \
                 description = $6, long_description = $7, cover_image = $8, \
                 featured = $9, characters = $10, themes = $11, quotes = $12, \
                 genre = $13, awards = $14, author_name = $15, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&book.id)
            .bind(&book.title)
            .bind(&book.series)
            .bind(book.book_number)
            .bind(book.year)
            .bind(&book.description)
            .bind(&book.long_description)
            .bind(&book.cover_image)
            .bind(book.featured)
            .bind(&book.characters)
            .bind(&book.themes)
            .bind(&book.quotes)
            .bind(&book.genre)
            .bind(&book.awards)
            .bind(&book.author_name)
            .fetch_optional(pool)
            .await
    }

    /// Insert a previously deleted book again, keeping its id and
    /// `created_at`.
    pub async fn restore(pool: &PgPool, book: &Book) -> Result<Book, sqlx::Error> {
        let query = format!(
            "INSERT INTO books \
                 (id, title, series, book_number, year, description, long_description, \
                  cover_image, featured, characters, themes, quotes, genre, awards, \
                  author_name, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&book.id)
            .bind(&book.title)
            .bind(&book.series)
            .bind(book.book_number)
            .bind(book.year)
            .bind(&book.description)
            .bind(&book.long_description)
            .bind(&book.cover_image)
            .bind(book.featured)
            .bind(&book.characters)
            .bind(&book.themes)
            .bind(&book.quotes)
            .bind(&book.genre)
            .bind(&book.awards)
            .bind(&book.author_name)
            .bind(book.created_at)
            .fetch_one(pool)
            .await
    }

    /// Delete a book by slug. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
