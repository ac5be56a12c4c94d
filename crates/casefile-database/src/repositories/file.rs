//! File record repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use casefile_core::error::{AppError, ErrorKind};
use casefile_core::result::AppResult;
use casefile_core::types::{CaseId, FileId, FolderId};
use casefile_entity::file::{FileRecord, FileStatus, NewFileRecord};

use crate::store::{CommitOutcome, FileAggregate, FileStore};

/// PostgreSQL-backed file metadata.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn create_pending(&self, data: &NewFileRecord) -> AppResult<FileRecord> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // Share-lock the folder so a concurrent cascade delete cannot slip
        // between the existence check and the insert.
        let folder: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM folders WHERE case_id = $1 AND id = $2 FOR SHARE",
        )
        .bind(data.case_id)
        .bind(data.folder_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock folder", e))?;

        if folder.is_none() {
            return Err(AppError::not_found(format!(
                "Folder {} not found in case {}",
                data.folder_id, data.case_id
            )));
        }

        let record = sqlx::query_as::<_, FileRecord>(
            "INSERT INTO files (id, case_id, folder_id, original_filename, stored_object_key, \
             size_bytes, mime_type, uploaded_by, document_category, tags, is_generated, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'pending') RETURNING *",
        )
        .bind(data.id)
        .bind(data.case_id)
        .bind(data.folder_id)
        .bind(&data.original_filename)
        .bind(&data.stored_object_key)
        .bind(data.size_bytes)
        .bind(&data.mime_type)
        .bind(&data.uploaded_by)
        .bind(&data.document_category)
        .bind(&data.tags)
        .bind(data.is_generated)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file record", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit file record", e)
        })?;
        Ok(record)
    }

    async fn find_by_id(&self, case_id: CaseId, id: FileId) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM files WHERE case_id = $1 AND id = $2")
            .bind(case_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn commit(&self, case_id: CaseId, id: FileId) -> AppResult<CommitOutcome> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let current = sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM files WHERE case_id = $1 AND id = $2",
        )
        .bind(case_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;

        if current.status == FileStatus::Committed {
            return Ok(CommitOutcome {
                record: current,
                transitioned: false,
            });
        }

        // Folder first, then file: the same order a cascade delete locks in.
        let folder: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM folders WHERE case_id = $1 AND id = $2 FOR SHARE",
        )
        .bind(case_id)
        .bind(current.folder_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock folder", e))?;

        if folder.is_none() {
            return Err(AppError::not_found(format!(
                "Folder of file {id} was deleted"
            )));
        }

        let updated = sqlx::query_as::<_, FileRecord>(
            "UPDATE files SET status = 'committed', updated_at = NOW() \
             WHERE id = $1 AND status IN ('pending', 'orphaned') RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit file", e))?;

        let Some(record) = updated else {
            // Purged by the sweep, or committed by a racing caller.
            let again = sqlx::query_as::<_, FileRecord>("SELECT * FROM files WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))?;
            return match again {
                Some(record) if record.status == FileStatus::Committed => Ok(CommitOutcome {
                    record,
                    transitioned: false,
                }),
                _ => Err(AppError::not_found(format!("File {id} was reclaimed"))),
            };
        };

        sqlx::query("UPDATE folders SET file_count = file_count + 1 WHERE id = $1")
            .bind(record.folder_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update file count", e)
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit file transition", e)
        })?;

        Ok(CommitOutcome {
            record,
            transitioned: true,
        })
    }

    async fn mark_orphaned(&self, case_id: CaseId, id: FileId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE files SET status = 'orphaned', updated_at = NOW() \
             WHERE case_id = $1 AND id = $2 AND status = 'pending'",
        )
        .bind(case_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to orphan file", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_committed_in_folder(
        &self,
        case_id: CaseId,
        folder_id: FolderId,
    ) -> AppResult<Vec<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM files WHERE case_id = $1 AND folder_id = $2 AND status = 'committed' \
             ORDER BY uploaded_at DESC, id ASC",
        )
        .bind(case_id)
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn list_committed(&self, case_id: CaseId) -> AppResult<Vec<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM files WHERE case_id = $1 AND status = 'committed' \
             ORDER BY uploaded_at DESC, id ASC",
        )
        .bind(case_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list case files", e))
    }

    async fn update_tags(
        &self,
        case_id: CaseId,
        id: FileId,
        tags: &[String],
    ) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "UPDATE files SET tags = $3, updated_at = NOW() \
             WHERE case_id = $1 AND id = $2 AND status = 'committed' RETURNING *",
        )
        .bind(case_id)
        .bind(id)
        .bind(tags)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update tags", e))
    }

    async fn update_category(
        &self,
        case_id: CaseId,
        id: FileId,
        category: Option<&str>,
    ) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "UPDATE files SET document_category = $3, updated_at = NOW() \
             WHERE case_id = $1 AND id = $2 AND status = 'committed' RETURNING *",
        )
        .bind(case_id)
        .bind(id)
        .bind(category)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update category", e))
    }

    async fn orphan_stale_pending(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE files SET status = 'orphaned', updated_at = NOW() \
             WHERE status = 'pending' AND uploaded_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to orphan stale uploads", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn find_orphaned(&self, limit: i64) -> AppResult<Vec<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM files WHERE status = 'orphaned' ORDER BY updated_at ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list orphaned files", e)
        })
    }

    async fn purge_orphaned(&self, case_id: CaseId, id: FileId) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM files WHERE case_id = $1 AND id = $2 AND status = 'orphaned'",
        )
        .bind(case_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to purge file", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn aggregate(&self, case_id: CaseId) -> AppResult<FileAggregate> {
        let (files, bytes, generated): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(size_bytes), 0)::BIGINT, \
             COUNT(*) FILTER (WHERE is_generated) \
             FROM files WHERE case_id = $1 AND status = 'committed'",
        )
        .bind(case_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to aggregate files", e))?;

        Ok(FileAggregate {
            files: files as u64,
            bytes: bytes as u64,
            generated: generated as u64,
        })
    }
}
