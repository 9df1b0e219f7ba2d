//! Handlers for the edit history ledger and undo.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use quill_core::edit_history::{clamp_history_limit, TrackedTable};
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::{AppPath, AppQuery};
use crate::ledger;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{ClearHistoryParams, HistoryLimitParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Outcome of an undo request.
#[derive(Debug, Serialize)]
pub struct UndoResult {
    pub success: bool,
}

/// Number of entries removed by a history clear.
#[derive(Debug, Serialize)]
pub struct ClearResult {
    pub deleted: u64,
}

/// GET /api/history?limit=
///
/// Most recent entries across all tables, newest first.
pub async fn list_recent(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<HistoryLimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_history_limit(params.limit);
    let entries = state.store.recent_history(limit).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/history/{table}/{record_id}
pub async fn list_record_history(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath((table, record_id)): AppPath<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let table = TrackedTable::parse(&table)?;
    let entries = state
        .store
        .record_history(table.as_str(), &record_id)
        .await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/history/{table}/{record_id}/undo
///
/// Always 200 for a tracked table; `success` says whether anything changed.
pub async fn undo_last_edit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath((table, record_id)): AppPath<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let table = TrackedTable::parse(&table)?;
    let success = ledger::undo_last_edit(state.store.as_ref(), table, &record_id).await;

    tracing::info!(
        %table,
        record_id = %record_id,
        success,
        user = %admin.subject,
        "Undo requested",
    );

    Ok(Json(DataResponse {
        data: UndoResult { success },
    }))
}

/// DELETE /api/history?table=
///
/// Without `table`, every entry is removed.
pub async fn clear_history(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ClearHistoryParams>,
) -> AppResult<impl IntoResponse> {
    let table = params
        .table
        .as_deref()
        .map(TrackedTable::parse)
        .transpose()?;

    let deleted = state
        .store
        .clear_history(table.map(TrackedTable::as_str))
        .await?;

    tracing::info!(
        table = table.map(TrackedTable::as_str).unwrap_or("*"),
        deleted,
        user = %admin.subject,
        "Edit history cleared",
    );

    Ok(Json(DataResponse {
        data: ClearResult { deleted },
    }))
}
