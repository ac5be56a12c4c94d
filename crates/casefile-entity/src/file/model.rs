//! File record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use casefile_core::types::{CaseId, FileId, FolderId};

use super::status::FileStatus;

/// Metadata for one uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique file identifier.
    pub id: FileId,
    /// Owning case.
    pub case_id: CaseId,
    /// The folder containing this file.
    pub folder_id: FolderId,
    /// File name as supplied by the uploader.
    pub original_filename: String,
    /// Opaque blob-store key.
    pub stored_object_key: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Normalized MIME type.
    pub mime_type: String,
    /// When the upload was accepted.
    pub uploaded_at: DateTime<Utc>,
    /// Advisor who uploaded the file.
    pub uploaded_by: String,
    /// Optional document category.
    pub document_category: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Whether the system produced this document.
    pub is_generated: bool,
    /// Lifecycle status.
    pub status: FileStatus,
    /// Last metadata change.
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Blob key for a file: `cases/{case_id}/{file_id}`.
    pub fn object_key(case_id: CaseId, file_id: FileId) -> String {
        format!("cases/{case_id}/{file_id}")
    }

    /// Whether any tag equals `needle`, ignoring case.
    pub fn has_tag(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == needle)
    }
}

/// Data required to write a pending file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFileRecord {
    /// Pre-assigned identifier.
    pub id: FileId,
    /// Owning case.
    pub case_id: CaseId,
    /// Target folder.
    pub folder_id: FolderId,
    /// File name as supplied.
    pub original_filename: String,
    /// Blob key.
    pub stored_object_key: String,
    /// Declared size in bytes.
    pub size_bytes: i64,
    /// Normalized MIME type.
    pub mime_type: String,
    /// Uploading advisor.
    pub uploaded_by: String,
    /// Optional category.
    pub document_category: Option<String>,
    /// Initial tags, already normalized.
    pub tags: Vec<String>,
    /// Produced by the system.
    pub is_generated: bool,
}

impl NewFileRecord {
    /// Materialize the pending row as it looks right after insertion.
    pub fn into_pending(self, now: DateTime<Utc>) -> FileRecord {
        FileRecord {
            id: self.id,
            case_id: self.case_id,
            folder_id: self.folder_id,
            original_filename: self.original_filename,
            stored_object_key: self.stored_object_key,
            size_bytes: self.size_bytes,
            mime_type: self.mime_type,
            uploaded_at: now,
            uploaded_by: self.uploaded_by,
            document_category: self.document_category,
            tags: self.tags,
            is_generated: self.is_generated,
            status: FileStatus::Pending,
            updated_at: now,
        }
    }
}

/// Normalize a tag set: trim, drop empties, de-duplicate case-insensitively
/// keeping the first spelling.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect()
}
