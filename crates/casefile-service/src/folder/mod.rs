//! Folder services.

pub mod initializer;
pub mod service;
pub mod tree;

pub use initializer::CaseInitializer;
pub use service::{DeleteFolderReport, FolderService};
pub use tree::TreeService;
