//! Worker runner: owns the schedules for the lifetime of the server.

use std::sync::Arc;

use tokio::sync::watch;

use casefile_core::config::worker::WorkerConfig;
use casefile_core::error::AppError;
use casefile_service::Filestore;

use crate::executor::JobExecutor;
use crate::jobs::{OrphanSweepJob, ReconcileStatsJob};
use crate::scheduler::CronScheduler;

/// Runs the maintenance schedules until cancelled
#[derive(Debug)]
pub struct WorkerRunner {
    /// Registered jobs
    executor: Arc<JobExecutor>,
    /// Worker configuration
    config: WorkerConfig,
}

impl WorkerRunner {
    /// Create a runner with the built-in jobs registered
    pub fn new(filestore: &Filestore, config: WorkerConfig) -> Self {
        let mut executor = JobExecutor::new();
        executor.register(Arc::new(OrphanSweepJob::new(Arc::clone(&filestore.sweeper))));
        executor.register(Arc::new(ReconcileStatsJob::new(Arc::clone(&filestore.stats))));
        Self {
            executor: Arc::new(executor),
            config,
        }
    }

    /// The job registry, for on-demand runs.
    pub fn executor(&self) -> Arc<JobExecutor> {
        Arc::clone(&self.executor)
    }

    /// Start the schedules and hold them until the cancel signal is received
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::info!("Maintenance worker disabled");
            return Ok(());
        }

        let scheduler = CronScheduler::new(Arc::clone(&self.executor)).await?;
        scheduler
            .schedule(OrphanSweepJob::NAME, &self.config.sweep_schedule)
            .await?;
        scheduler
            .schedule(ReconcileStatsJob::NAME, &self.config.reconcile_schedule)
            .await?;
        scheduler.start().await?;

        tracing::info!(
            sweep = %self.config.sweep_schedule,
            reconcile = %self.config.reconcile_schedule,
            "Maintenance worker started"
        );

        while !*cancel.borrow() {
            if cancel.changed().await.is_err() {
                break;
            }
        }

        tracing::info!("Maintenance worker received shutdown signal");
        scheduler.shutdown().await
    }
}
