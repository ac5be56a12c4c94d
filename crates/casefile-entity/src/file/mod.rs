//! File domain entities.

pub mod model;
pub mod status;
pub mod upload;

pub use model::{FileRecord, NewFileRecord};
pub use status::FileStatus;
pub use upload::UploadPhase;
