//! Case usage statistics.

pub mod aggregator;

pub use aggregator::{StatsAggregator, StatsDelta, StatsPermit};
