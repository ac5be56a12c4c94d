//! Garbage collection of abandoned uploads.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use casefile_core::result::AppResult;
use casefile_core::traits::storage::BlobStore;
use casefile_database::store::FileStore;

/// Orphaned records reclaimed per store round-trip.
const SWEEP_BATCH: i64 = 500;

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SweepReport {
    /// Pending records past the grace period that were orphaned.
    pub stale_orphaned: u64,
    /// Orphaned records purged.
    pub reclaimed: u64,
    /// Purged records whose blob could not be deleted.
    pub blob_failures: u64,
}

/// Orphans stale uploads and reclaims orphaned records with their blobs.
#[derive(Debug, Clone)]
pub struct OrphanSweeper {
    files: Arc<dyn FileStore>,
    blobs: Arc<dyn BlobStore>,
    pending_grace: Duration,
}

impl OrphanSweeper {
    /// Creates a new sweeper.
    pub fn new(files: Arc<dyn FileStore>, blobs: Arc<dyn BlobStore>, pending_grace_seconds: u64) -> Self {
        Self {
            files,
            blobs,
            pending_grace: Duration::seconds(pending_grace_seconds as i64),
        }
    }

    /// Run one sweep as of `now`.
    pub async fn sweep(&self, now: DateTime<Utc>) -> AppResult<SweepReport> {
        let mut report = SweepReport {
            stale_orphaned: self.files.orphan_stale_pending(now - self.pending_grace).await?,
            ..SweepReport::default()
        };

        loop {
            let batch = self.files.find_orphaned(SWEEP_BATCH).await?;
            let fetched = batch.len();
            let mut purged = 0u64;

            for record in batch {
                // The record goes first; a blob without a record is unreachable.
                if !self.files.purge_orphaned(record.case_id, record.id).await? {
                    continue;
                }
                purged += 1;
                if let Err(e) = self.blobs.delete(&record.stored_object_key).await {
                    report.blob_failures += 1;
                    warn!(
                        file_id = %record.id,
                        key = %record.stored_object_key,
                        error = %e,
                        "Failed to delete orphaned blob"
                    );
                }
            }

            report.reclaimed += purged;
            if (fetched as i64) < SWEEP_BATCH || purged == 0 {
                break;
            }
        }

        if report.stale_orphaned > 0 || report.reclaimed > 0 {
            info!(
                stale_orphaned = report.stale_orphaned,
                reclaimed = report.reclaimed,
                blob_failures = report.blob_failures,
                "Orphan sweep completed"
            );
        }
        Ok(report)
    }
}
