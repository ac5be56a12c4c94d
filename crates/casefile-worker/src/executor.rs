//! Job executor: dispatches maintenance jobs by name.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;

use casefile_core::error::AppError;

/// A unit of scheduled maintenance.
#[async_trait]
pub trait MaintenanceJob: Send + Sync + std::fmt::Debug {
    /// Name the job is registered and logged under.
    fn name(&self) -> &'static str;

    /// Run the job once and describe what it did.
    async fn execute(&self) -> Result<Value, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// No job registered under the name
    #[error("Unknown job '{0}'")]
    Unknown(String),

    /// Failure that the next scheduled run may not hit
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Error raised by the filestore
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

/// Registry of maintenance jobs.
#[derive(Debug, Default)]
pub struct JobExecutor {
    jobs: HashMap<&'static str, Arc<dyn MaintenanceJob>>,
}

impl JobExecutor {
    /// Create an empty executor
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job under its name, replacing any previous one.
    pub fn register(&mut self, job: Arc<dyn MaintenanceJob>) {
        tracing::info!(job = job.name(), "Registered maintenance job");
        self.jobs.insert(job.name(), job);
    }

    /// Registered job names.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.jobs.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Run the job registered under `name`.
    pub async fn execute(&self, name: &str) -> Result<Value, JobExecutionError> {
        let job = self
            .jobs
            .get(name)
            .ok_or_else(|| JobExecutionError::Unknown(name.to_string()))?;

        let started = Instant::now();
        let result = job.execute().await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(output) => tracing::info!(job = name, elapsed_ms, output = %output, "Job completed"),
            Err(e) => tracing::error!(job = name, elapsed_ms, error = %e, "Job failed"),
        }
        result
    }
}
