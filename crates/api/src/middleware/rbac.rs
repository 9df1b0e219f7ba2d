//! Admin gate for content mutations and moderation.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use quill_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated caller holding the `admin` role.
///
/// No token or a bad token is 401; a valid token without the role is 403.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!(
                subject = %user.subject,
                role = %user.role,
                token_id = %user.token_id,
                path = %parts.uri.path(),
                "Non-admin token used on admin endpoint",
            );
            return Err(CoreError::Forbidden("Admin role required".into()).into());
        }
        Ok(RequireAdmin(user))
    }
}
