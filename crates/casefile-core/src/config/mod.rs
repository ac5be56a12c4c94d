//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files plus `CASEFILE__`-prefixed environment variables.
//! Every field carries a serde default, so an empty source yields a working
//! in-memory development setup.

pub mod app;
pub mod database;
pub mod logging;
pub mod storage;
pub mod worker;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use self::storage::StorageConfig;
use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Metadata store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage and upload settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Background maintenance settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default.toml`, then `config/{env}.toml`, then
    /// environment variables such as `CASEFILE__SERVER__PORT=9000`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CASEFILE")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("storage.allowed_mime_types")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let app: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        app.validate()?;
        Ok(app)
    }

    /// Reject settings that would make the filestore unusable.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.storage.max_upload_size_bytes == 0 {
            return Err(AppError::configuration(
                "storage.max_upload_size_bytes must be greater than zero",
            ));
        }
        if self.storage.allowed_mime_types.is_empty() {
            return Err(AppError::configuration(
                "storage.allowed_mime_types must not be empty",
            ));
        }
        if self.storage.upload_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "storage.upload_timeout_seconds must be greater than zero",
            ));
        }
        if self.database.backend == database::DatabaseBackend::Postgres
            && self.database.url.is_empty()
        {
            return Err(AppError::configuration(
                "database.url is required for the postgres backend",
            ));
        }
        Ok(())
    }
}
