use std::sync::Arc;

use quill_db::ContentStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: both fields are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend selected at startup.
    pub store: Arc<dyn ContentStore>,
    pub config: Arc<ServerConfig>,
}
