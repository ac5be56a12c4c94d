//! # casefile-storage
//!
//! Blob store implementations for the case filestore: the local filesystem
//! for deployments and process memory for development and tests.

pub mod providers;

use std::sync::Arc;

use tracing::info;

use casefile_core::config::storage::{BlobBackend, StorageConfig};
use casefile_core::result::AppResult;
use casefile_core::traits::storage::BlobStore;

pub use providers::local::LocalBlobStore;
pub use providers::memory::MemoryBlobStore;

/// Build the blob store selected by configuration.
pub async fn build_blob_store(config: &StorageConfig) -> AppResult<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match config.blob {
        BlobBackend::Local => Arc::new(LocalBlobStore::new(&config.local_root).await?),
        BlobBackend::Memory => Arc::new(MemoryBlobStore::new()),
    };
    info!(provider = store.provider_type(), "Blob store ready");
    Ok(store)
}
