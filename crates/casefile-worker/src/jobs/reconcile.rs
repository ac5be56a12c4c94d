//! Stats reconciliation job.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use casefile_service::StatsAggregator;

use crate::executor::{JobExecutionError, MaintenanceJob};

/// Recounts the stats of every tracked case.
#[derive(Debug)]
pub struct ReconcileStatsJob {
    stats: Arc<StatsAggregator>,
}

impl ReconcileStatsJob {
    /// Name the job is registered under.
    pub const NAME: &'static str = "stats_reconcile";

    /// Create a new reconciliation job
    pub fn new(stats: Arc<StatsAggregator>) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl MaintenanceJob for ReconcileStatsJob {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn execute(&self) -> Result<Value, JobExecutionError> {
        let mut reconciled = 0u64;
        let mut failed = 0u64;

        // One bad case must not stop the rest.
        for case_id in self.stats.tracked_cases() {
            match self.stats.reconcile(case_id).await {
                Ok(Some(_)) => reconciled += 1,
                Ok(None) => {}
                Err(e) => {
                    failed += 1;
                    tracing::warn!(case_id = %case_id, error = %e, "Stats reconciliation failed");
                }
            }
        }

        if failed > 0 {
            return Err(JobExecutionError::Transient(format!(
                "{failed} cases could not be reconciled"
            )));
        }
        Ok(serde_json::json!({
            "task": Self::NAME,
            "reconciled": reconciled,
        }))
    }
}
