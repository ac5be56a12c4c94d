//! Breadcrumb trail entries.

use serde::{Deserialize, Serialize};

/// One step of a breadcrumb trail: the display name of a folder and the
/// canonical path prefix that resolves to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Folder display name.
    pub name: String,
    /// Canonical path of the folder.
    pub path: String,
}
