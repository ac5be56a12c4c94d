//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use casefile_core::config::AppConfig;
use casefile_service::Filestore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Filestore services
    pub filestore: Filestore,
}

impl AppState {
    /// Creates the state from configuration and wired services.
    pub fn new(config: AppConfig, filestore: Filestore) -> Self {
        Self {
            config: Arc::new(config),
            filestore,
        }
    }
}
