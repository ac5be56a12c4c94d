//! Core traits defined in `casefile-core` and implemented by other crates.

pub mod storage;

pub use storage::{BlobStore, ByteStream};
