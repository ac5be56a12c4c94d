//! Casefile server: per-case document filestore.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use casefile_core::config::AppConfig;
use casefile_core::config::database::DatabaseBackend;
use casefile_core::error::AppError;
use casefile_database::store::{FileStore, FolderStore};
use casefile_database::{DatabasePool, FileRepository, FolderRepository, MemoryStore};
use casefile_service::Filestore;
use casefile_worker::WorkerRunner;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("CASEFILE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting casefile server");

    // ── Step 1: Metadata stores ──────────────────────────────────
    let (folder_store, file_store, db_pool) = match config.database.backend {
        DatabaseBackend::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;
            let folders: Arc<dyn FolderStore> = Arc::new(FolderRepository::new(pool.pool()));
            let files: Arc<dyn FileStore> = Arc::new(FileRepository::new(pool.pool()));
            (folders, files, Some(pool))
        }
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory metadata store; data is lost on exit");
            let store = Arc::new(MemoryStore::new());
            let folders: Arc<dyn FolderStore> = store.clone();
            let files: Arc<dyn FileStore> = store;
            (folders, files, None)
        }
    };

    // ── Step 2: Blob store ───────────────────────────────────────
    let blobs = casefile_storage::build_blob_store(&config.storage).await?;

    // ── Step 3: Services ─────────────────────────────────────────
    let filestore = Filestore::new(folder_store, file_store, blobs, &config.storage);

    // ── Step 4: Shutdown channel & worker ────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker = WorkerRunner::new(&filestore, config.worker.clone());
    let worker_handle = tokio::spawn(async move {
        if let Err(e) = worker.run(shutdown_rx).await {
            tracing::error!(error = %e, "Maintenance worker failed");
        }
    });

    // ── Step 5: Build and start HTTP server ──────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app = casefile_api::build_app(casefile_api::AppState::new(config, filestore));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "Casefile server listening");

    // ── Step 6: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 7: Wait for background tasks ────────────────────────
    let _ = tokio::time::timeout(grace, worker_handle).await;
    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("Casefile server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
