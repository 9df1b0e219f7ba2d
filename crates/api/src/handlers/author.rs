//! Handlers for the singleton author profile.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use quill_core::error::CoreError;
use quill_core::validation::{
    validate_email, validate_json_object, validate_required, MAX_TITLE_LEN,
};
use quill_db::models::author::UpsertAuthor;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_upsert(input: &UpsertAuthor) -> Result<(), CoreError> {
    validate_required("name", &input.name, MAX_TITLE_LEN)?;
    validate_email("email", input.email.as_deref())?;
    if let Some(links) = &input.social_media {
        validate_json_object("social_media", links)?;
    }
    if let Some(stats) = &input.stats {
        validate_json_object("stats", stats)?;
    }
    Ok(())
}

/// GET /api/author
///
/// `data` is `null` until a profile has been saved.
pub async fn get_author(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let author = state.store.find_author().await?;
    Ok(Json(DataResponse { data: author }))
}

/// PUT /api/author
///
/// Creates the profile on first save, updates it afterwards. Omitted
/// optional fields keep their stored values.
pub async fn upsert_author(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpsertAuthor>,
) -> AppResult<impl IntoResponse> {
    validate_upsert(&input)?;

    let author = state.store.upsert_author(&input).await?;

    tracing::info!(author_id = author.id, user = %admin.subject, "Author profile saved");

    Ok(Json(DataResponse { data: author }))
}
