//! Built-in maintenance jobs.

pub mod reconcile;
pub mod sweep;

pub use reconcile::ReconcileStatsJob;
pub use sweep::OrphanSweepJob;
