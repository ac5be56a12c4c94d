//! File metadata reads and edits.

use std::sync::Arc;

use tracing::info;

use casefile_core::error::AppError;
use casefile_core::result::AppResult;
use casefile_core::traits::storage::{BlobStore, ByteStream};
use casefile_core::types::{CaseId, FileId};
use casefile_database::store::FileStore;
use casefile_entity::file::FileRecord;
use casefile_entity::file::model::normalize_tags;

use crate::context::RequestContext;
use crate::folder::FolderService;

/// Maximum length of a document category.
const MAX_CATEGORY_LEN: usize = 100;

/// Lists, fetches, downloads, tags, and categorizes committed files.
#[derive(Debug, Clone)]
pub struct FileService {
    files: Arc<dyn FileStore>,
    folders: Arc<FolderService>,
    blobs: Arc<dyn BlobStore>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        files: Arc<dyn FileStore>,
        folders: Arc<FolderService>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            files,
            folders,
            blobs,
        }
    }

    /// Committed files directly in the folder at `folder_path`, newest first.
    pub async fn list_files_in_folder(
        &self,
        case_id: CaseId,
        folder_path: &str,
    ) -> AppResult<Vec<FileRecord>> {
        let folder = self.folders.resolve_path(case_id, folder_path).await?;
        self.files.list_committed_in_folder(case_id, folder.id).await
    }

    /// A committed file of the case.
    pub async fn get_file(&self, case_id: CaseId, file_id: FileId) -> AppResult<FileRecord> {
        self.files
            .find_by_id(case_id, file_id)
            .await?
            .filter(|record| record.status.is_visible())
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// A committed file together with its content stream.
    pub async fn download_file(
        &self,
        case_id: CaseId,
        file_id: FileId,
    ) -> AppResult<(FileRecord, ByteStream)> {
        let record = self.get_file(case_id, file_id).await?;
        let stream = self.blobs.get(&record.stored_object_key).await?;
        Ok((record, stream))
    }

    /// Replace the tag set of a committed file.
    pub async fn tag_file(
        &self,
        ctx: &RequestContext,
        case_id: CaseId,
        file_id: FileId,
        tags: &[String],
    ) -> AppResult<FileRecord> {
        let tags = normalize_tags(tags);
        let record = self
            .files
            .update_tags(case_id, file_id, &tags)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        info!(
            case_id = %case_id,
            file_id = %file_id,
            tags = tags.len(),
            advisor = %ctx.advisor_id,
            "File tags replaced"
        );
        Ok(record)
    }

    /// Set or clear the category of a committed file.
    pub async fn set_category(
        &self,
        ctx: &RequestContext,
        case_id: CaseId,
        file_id: FileId,
        category: Option<&str>,
    ) -> AppResult<FileRecord> {
        let category = normalize_category(category)?;
        let record = self
            .files
            .update_category(case_id, file_id, category.as_deref())
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        info!(
            case_id = %case_id,
            file_id = %file_id,
            category = category.as_deref().unwrap_or("-"),
            advisor = %ctx.advisor_id,
            "File category set"
        );
        Ok(record)
    }
}

/// Trim a category; blank means none.
pub fn normalize_category(category: Option<&str>) -> AppResult<Option<String>> {
    let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    if category.chars().count() > MAX_CATEGORY_LEN {
        return Err(AppError::validation(format!(
            "Category exceeds {MAX_CATEGORY_LEN} characters"
        )));
    }
    Ok(Some(category.to_string()))
}
