//! Scheduled maintenance for the case filestore.
//!
//! This crate provides:
//! - A job executor that dispatches maintenance jobs by name
//! - A cron scheduler that triggers them
//! - The orphan sweep and stats reconciliation jobs

pub mod executor;
pub mod jobs;
pub mod runner;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, MaintenanceJob};
pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
