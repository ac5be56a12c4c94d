//! Orphan sweep job.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use casefile_service::OrphanSweeper;

use crate::executor::{JobExecutionError, MaintenanceJob};

/// Orphans stale pending uploads and reclaims orphaned records.
#[derive(Debug)]
pub struct OrphanSweepJob {
    sweeper: Arc<OrphanSweeper>,
}

impl OrphanSweepJob {
    /// Name the job is registered under.
    pub const NAME: &'static str = "orphan_sweep";

    /// Create a new sweep job
    pub fn new(sweeper: Arc<OrphanSweeper>) -> Self {
        Self { sweeper }
    }
}

#[async_trait]
impl MaintenanceJob for OrphanSweepJob {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn execute(&self) -> Result<Value, JobExecutionError> {
        let report = self.sweeper.sweep(Utc::now()).await?;
        if report.blob_failures > 0 {
            return Err(JobExecutionError::Transient(format!(
                "{} of {} orphaned blobs could not be deleted",
                report.blob_failures, report.reclaimed
            )));
        }
        Ok(serde_json::json!({
            "task": Self::NAME,
            "stale_orphaned": report.stale_orphaned,
            "reclaimed": report.reclaimed,
        }))
    }
}
