use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use quill_api::config::{ServerConfig, StoreBackend, StoreConfig};
use quill_api::router::build_app_router;
use quill_api::state::AppState;
use quill_db::{ContentStore, DbPool, MemoryStore, PgStore, SeedData};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quill_api=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(env_filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = ?config.store.backend,
        "Loaded server configuration",
    );

    // --- Storage ---
    let (store, pool) = open_store(&config.store).await;

    // --- Router ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if let Some(pool) = pool {
        let drain = Duration::from_secs(config.shutdown_timeout_secs);
        if tokio::time::timeout(drain, pool.close()).await.is_err() {
            tracing::warn!("Timed out closing database connections");
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Open the configured backend. The pool is returned separately so it can
/// be closed on shutdown.
///
/// Panics on misconfiguration or an unreachable database.
async fn open_store(config: &StoreConfig) -> (Arc<dyn ContentStore>, Option<DbPool>) {
    match config.backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set for the postgres backend");

            let pool = quill_db::create_pool(database_url, config.max_connections)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            quill_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            quill_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let store: Arc<dyn ContentStore> = Arc::new(PgStore::new(pool.clone()));
            (store, Some(pool))
        }
        StoreBackend::Memory => {
            let seed = match &config.seed_data_path {
                Some(path) => {
                    let raw = std::fs::read_to_string(path)
                        .unwrap_or_else(|e| panic!("Failed to read seed data '{path}': {e}"));
                    serde_json::from_str::<SeedData>(&raw)
                        .unwrap_or_else(|e| panic!("Invalid seed data '{path}': {e}"))
                }
                None => SeedData::default(),
            };

            let store: Arc<dyn ContentStore> = Arc::new(
                MemoryStore::seeded(seed)
                    .await
                    .expect("Failed to load seed data"),
            );
            tracing::warn!("Using in-memory store; content is lost on restart");

            (store, None)
        }
    }
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
