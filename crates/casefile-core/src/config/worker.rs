//! Background maintenance configuration.

use serde::{Deserialize, Serialize};

/// Scheduled maintenance job configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression (with seconds) for the orphan sweep.
    #[serde(default = "default_sweep_schedule")]
    pub sweep_schedule: String,
    /// Cron expression (with seconds) for stats reconciliation.
    #[serde(default = "default_reconcile_schedule")]
    pub reconcile_schedule: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sweep_schedule: default_sweep_schedule(),
            reconcile_schedule: default_reconcile_schedule(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sweep_schedule() -> String {
    "0 */5 * * * *".to_string()
}

fn default_reconcile_schedule() -> String {
    "0 0 * * * *".to_string()
}
