//! Core type definitions used across the casefile workspace.

pub mod id;

pub use id::*;
