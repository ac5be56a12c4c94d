//! Folder domain entities.

pub mod breadcrumb;
pub mod model;
pub mod tree;

pub use breadcrumb::Breadcrumb;
pub use model::{FolderNode, NewFolder};
pub use tree::{FolderTree, FolderTreeNode};
