//! Handler for `POST /auth/login`.

use axum::extract::State;
use axum::Json;
use quill_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::issue_access_token;
use crate::auth::password::verify_password;
use crate::auth::ROLE_ADMIN;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// POST /api/auth/login
///
/// Exchange the admin username and password for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let admin = &state.config.admin;
    let password_valid = verify_password(&input.password, &admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if input.username != admin.username || !password_valid {
        tracing::warn!(username = %input.username, "Failed login attempt");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    let issued = issue_access_token(&admin.username, ROLE_ADMIN, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(username = %admin.username, token_id = %issued.token_id, "Admin logged in");

    Ok(Json(AuthResponse {
        access_token: issued.token,
        expires_in: issued.expires_in,
    }))
}
