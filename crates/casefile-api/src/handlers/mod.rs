//! HTTP request handlers grouped by domain.

pub mod case;
pub mod file;
pub mod folder;
pub mod health;
pub mod maintenance;
pub mod search;
