//! File services: metadata reads and edits, uploads, search, and sweeping.

pub mod search;
pub mod service;
pub mod sweep;
pub mod upload;

pub use search::{SearchResults, SearchService};
pub use service::FileService;
pub use sweep::{OrphanSweeper, SweepReport};
pub use upload::{UploadPolicy, UploadRequest, UploadService};
