//! Upload progress phases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a single upload, logged at every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    /// Request accepted and validated; pending record written.
    Received,
    /// Bytes are streaming to the blob store.
    BlobWriting,
    /// Blob store acknowledged the full payload.
    BlobConfirmed,
    /// Record committed and visible.
    Committed,
    /// Blob write failed, timed out, or was cancelled.
    BlobFailed,
    /// Record marked orphaned.
    Orphaned,
}

impl UploadPhase {
    /// Return the phase as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::BlobWriting => "blob_writing",
            Self::BlobConfirmed => "blob_confirmed",
            Self::Committed => "committed",
            Self::BlobFailed => "blob_failed",
            Self::Orphaned => "orphaned",
        }
    }
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
