//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use casefile_core::types::{FileId, FolderId};
use casefile_entity::file::FileRecord;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// A committed file as shown to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
    /// File ID.
    pub id: FileId,
    /// Containing folder.
    pub folder_id: FolderId,
    /// Name as uploaded.
    pub original_filename: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Content type.
    pub mime_type: String,
    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
    /// Uploading advisor.
    pub uploaded_by: String,
    /// Category.
    pub document_category: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Produced by the system.
    pub is_generated: bool,
}

impl From<FileRecord> for FileResponse {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            folder_id: record.folder_id,
            original_filename: record.original_filename,
            size_bytes: record.size_bytes,
            mime_type: record.mime_type,
            uploaded_at: record.uploaded_at,
            uploaded_by: record.uploaded_by,
            document_category: record.document_category,
            tags: record.tags,
            is_generated: record.is_generated,
        }
    }
}

/// Search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The query as received.
    pub query: String,
    /// Number of matches.
    pub total: usize,
    /// Matches, newest first.
    pub items: Vec<FileResponse>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Blob store provider.
    pub blob_store: String,
    /// Whether the blob store answered its health check.
    pub blob_store_healthy: bool,
}
