//! # casefile-database
//!
//! Metadata persistence for folders and file records. The [`store`] module
//! defines the storage contracts; [`repositories`] implements them on
//! PostgreSQL and [`memory`] implements them in process.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use repositories::{FileRepository, FolderRepository};
pub use store::{CommitOutcome, DeletedSubtree, FileAggregate, FileStore, FolderStore, SeedOutcome};
