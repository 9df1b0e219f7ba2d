//! Boundary validation for content submitted through the API.
//!
//! Functions return [`CoreError::Validation`] with a message naming the
//! offending field so handlers can pass it straight to the client.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum length of short text fields (titles, names, labels).
pub const MAX_TITLE_LEN: usize = 300;

/// Maximum length of a book slug.
pub const MAX_SLUG_LEN: usize = 120;

/// Maximum length of a reader comment.
pub const MAX_COMMENT_LEN: usize = 5_000;

/// Maximum length of a blog post body, in characters.
pub const MAX_POST_CONTENT_LEN: usize = 200_000;

/// Maximum length of an anonymous visitor identifier.
pub const MAX_VISITOR_ID_LEN: usize = 128;

/// Lowercase words separated by single hyphens, e.g. `the-iron-crown`.
const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";

/// Deliberately loose: one `@` with a dot somewhere in the domain.
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(SLUG_PATTERN).expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

/// Validate a book identifier.
pub fn validate_slug(field: &str, value: &str) -> Result<(), CoreError> {
    if value.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    if !SLUG_RE.is_match(value) {
        return Err(CoreError::Validation(format!(
            "{field} must be lowercase letters and digits separated by single hyphens"
        )));
    }
    Ok(())
}

/// Validate that a required text field is present and not blank.
pub fn validate_required(field: &str, value: &str, max_len: usize) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

/// Validate an optional replacement for a required field (update payloads).
pub fn validate_optional_required(
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Result<(), CoreError> {
    match value {
        Some(v) => validate_required(field, v, max_len),
        None => Ok(()),
    }
}

/// Validate a book's position in its series.
pub fn validate_book_number(value: i32) -> Result<(), CoreError> {
    if value < 0 {
        return Err(CoreError::Validation(
            "book_number must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// Validate an optional email address.
pub fn validate_email(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) if !EMAIL_RE.is_match(v) => Err(CoreError::Validation(format!(
            "{field} is not a valid email address"
        ))),
        _ => Ok(()),
    }
}

/// Validate that an embedded document is a JSON object.
pub fn validate_json_object(field: &str, value: &serde_json::Value) -> Result<(), CoreError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be a JSON object"
        )))
    }
}
