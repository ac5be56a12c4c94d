//! Blob storage and upload policy configuration.

use serde::{Deserialize, Serialize};

/// Which blob store holds file bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    /// Local filesystem under [`StorageConfig::local_root`].
    #[default]
    Local,
    /// Process memory; for development and tests.
    Memory,
}

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Selected blob backend.
    #[serde(default)]
    pub blob: BlobBackend,
    /// Root directory of the local blob backend.
    #[serde(default = "default_local_root")]
    pub local_root: String,
    /// Maximum upload size in bytes (default 50 MiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// MIME types accepted for upload, compared case-insensitively.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
    /// Upper bound on one blob write, in seconds.
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_seconds: u64,
    /// Age after which a pending record is presumed abandoned.
    #[serde(default = "default_pending_grace")]
    pub pending_grace_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            blob: BlobBackend::default(),
            local_root: default_local_root(),
            max_upload_size_bytes: default_max_upload(),
            allowed_mime_types: default_allowed_mime_types(),
            upload_timeout_seconds: default_upload_timeout(),
            pending_grace_seconds: default_pending_grace(),
        }
    }
}

fn default_local_root() -> String {
    "./data/blobs".to_string()
}

fn default_max_upload() -> u64 {
    52_428_800 // 50 MiB
}

fn default_allowed_mime_types() -> Vec<String> {
    [
        "application/pdf",
        "image/jpeg",
        "image/png",
        "image/gif",
        "image/webp",
        "text/plain",
        "text/csv",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "application/vnd.ms-excel",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_upload_timeout() -> u64 {
    120
}

fn default_pending_grace() -> u64 {
    3600
}
