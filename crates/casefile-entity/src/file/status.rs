//! File record lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a file record.
///
/// Records are written `pending` before any bytes move, become `committed`
/// once the blob write is confirmed, and `orphaned` when the write fails,
/// times out, is cancelled, or the containing folder is force-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "file_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Reserved; blob write not yet confirmed.
    Pending,
    /// Blob confirmed; visible to listing, search, stats, and download.
    Committed,
    /// Abandoned; awaiting reclamation by the sweep.
    Orphaned,
}

impl FileStatus {
    /// Whether the record is visible to readers.
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Committed)
    }

    /// Whether the record still counts as occupying its folder.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Pending | Self::Committed)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Committed => "committed",
            Self::Orphaned => "orphaned",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
