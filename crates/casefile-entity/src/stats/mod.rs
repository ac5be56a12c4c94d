//! Case usage statistics.

pub mod model;

pub use model::CaseStats;
