//! # casefile-core
//!
//! Core crate for the case document filestore. Contains the blob-store
//! trait, configuration schemas, typed identifiers, folder path rules,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other casefile crates.

pub mod config;
pub mod error;
pub mod path;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
