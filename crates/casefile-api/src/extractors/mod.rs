//! Custom Axum extractors.

pub mod advisor;
pub mod path;

pub use advisor::{Advisor, RequiredAdvisor};
pub use path::{parse_case_id, parse_file_id};
