//! PostgreSQL implementations of the metadata store traits.

pub mod file;
pub mod folder;

pub use file::FileRepository;
pub use folder::FolderRepository;
