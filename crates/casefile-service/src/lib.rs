//! # casefile-service
//!
//! Business logic for the case filestore. Services orchestrate the folder
//! and file stores, the blob store, and the stats aggregator to implement
//! the filestore operations.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references. [`Filestore`] wires the full set.

pub mod context;
pub mod file;
pub mod folder;
pub mod stats;

use std::sync::Arc;

use casefile_core::config::storage::StorageConfig;
use casefile_core::traits::storage::BlobStore;
use casefile_database::store::{FileStore, FolderStore};

pub use context::RequestContext;
pub use file::{
    FileService, OrphanSweeper, SearchResults, SearchService, SweepReport, UploadPolicy,
    UploadRequest, UploadService,
};
pub use folder::{CaseInitializer, DeleteFolderReport, FolderService, TreeService};
pub use stats::{StatsAggregator, StatsDelta, StatsPermit};

/// Every filestore service, sharing one set of stores.
#[derive(Debug, Clone)]
pub struct Filestore {
    /// Folder create, list, resolve, and delete.
    pub folders: Arc<FolderService>,
    /// Default taxonomy seeding.
    pub initializer: Arc<CaseInitializer>,
    /// Whole-tree reads.
    pub tree: Arc<TreeService>,
    /// File reads and metadata edits.
    pub files: Arc<FileService>,
    /// Upload protocol.
    pub uploads: Arc<UploadService>,
    /// Search.
    pub search: Arc<SearchService>,
    /// Orphan reclamation.
    pub sweeper: Arc<OrphanSweeper>,
    /// Per-case counters.
    pub stats: Arc<StatsAggregator>,
    /// Blob store, exposed for health checks.
    pub blobs: Arc<dyn BlobStore>,
}

impl Filestore {
    /// Wire the services over the given stores.
    pub fn new(
        folder_store: Arc<dyn FolderStore>,
        file_store: Arc<dyn FileStore>,
        blobs: Arc<dyn BlobStore>,
        config: &StorageConfig,
    ) -> Self {
        let stats = Arc::new(StatsAggregator::new(
            Arc::clone(&folder_store),
            Arc::clone(&file_store),
        ));
        let folders = Arc::new(FolderService::new(
            Arc::clone(&folder_store),
            Arc::clone(&stats),
        ));

        Self {
            initializer: Arc::new(CaseInitializer::new(
                Arc::clone(&folder_store),
                Arc::clone(&stats),
            )),
            tree: Arc::new(TreeService::new(folder_store)),
            files: Arc::new(FileService::new(
                Arc::clone(&file_store),
                Arc::clone(&folders),
                Arc::clone(&blobs),
            )),
            uploads: Arc::new(UploadService::new(
                Arc::clone(&file_store),
                Arc::clone(&folders),
                Arc::clone(&blobs),
                Arc::clone(&stats),
                UploadPolicy::from_config(config),
            )),
            search: Arc::new(SearchService::new(Arc::clone(&file_store))),
            sweeper: Arc::new(OrphanSweeper::new(
                file_store,
                Arc::clone(&blobs),
                config.pending_grace_seconds,
            )),
            folders,
            stats,
            blobs,
        }
    }
}
