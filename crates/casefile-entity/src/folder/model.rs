//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use casefile_core::types::{CaseId, FolderId};

/// A folder in a case's document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FolderNode {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The case that owns this folder for its whole lifetime.
    pub case_id: CaseId,
    /// Parent folder ID (null for case-root folders).
    pub parent_id: Option<FolderId>,
    /// Display name as entered, e.g. `Financial Statements`.
    pub name: String,
    /// Canonical slug path, e.g. `financial-statements/2023`.
    pub path: String,
    /// Number of ancestors (0 for roots).
    pub depth: i32,
    /// Committed files directly inside this folder.
    pub file_count: i64,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

impl FolderNode {
    /// Check if this is a case-root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFolder {
    /// Pre-assigned identifier.
    pub id: FolderId,
    /// Owning case.
    pub case_id: CaseId,
    /// Parent folder (None for a root).
    pub parent_id: Option<FolderId>,
    /// Display name.
    pub name: String,
    /// Canonical path.
    pub path: String,
    /// Depth in the tree.
    pub depth: i32,
}

impl NewFolder {
    /// Materialize the row as it looks right after insertion.
    pub fn into_node(self, created_at: DateTime<Utc>) -> FolderNode {
        FolderNode {
            id: self.id,
            case_id: self.case_id,
            parent_id: self.parent_id,
            name: self.name,
            path: self.path,
            depth: self.depth,
            file_count: 0,
            created_at,
        }
    }
}
