//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use casefile_core::error::{AppError, ErrorKind};
use casefile_core::result::AppResult;
use casefile_core::types::{CaseId, FolderId};
use casefile_entity::file::FileRecord;
use casefile_entity::folder::{FolderNode, NewFolder};

use crate::store::{DeletedSubtree, FolderStore, SeedOutcome};

const PATH_CONSTRAINT: &str = "folders_case_id_path_key";
const PARENT_CONSTRAINT: &str = "folders_parent_id_fkey";

/// PostgreSQL-backed folder tree.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn find_by_id(&self, case_id: CaseId, id: FolderId) -> AppResult<Option<FolderNode>> {
        sqlx::query_as::<_, FolderNode>("SELECT * FROM folders WHERE case_id = $1 AND id = $2")
            .bind(case_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn find_by_path(&self, case_id: CaseId, path: &str) -> AppResult<Option<FolderNode>> {
        sqlx::query_as::<_, FolderNode>("SELECT * FROM folders WHERE case_id = $1 AND path = $2")
            .bind(case_id)
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find folder by path", e)
            })
    }

    async fn find_children(
        &self,
        case_id: CaseId,
        parent_id: Option<FolderId>,
    ) -> AppResult<Vec<FolderNode>> {
        sqlx::query_as::<_, FolderNode>(
            "SELECT * FROM folders WHERE case_id = $1 AND parent_id IS NOT DISTINCT FROM $2 \
             ORDER BY LOWER(name) ASC, name ASC",
        )
        .bind(case_id)
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    async fn find_all(&self, case_id: CaseId) -> AppResult<Vec<FolderNode>> {
        sqlx::query_as::<_, FolderNode>(
            "SELECT * FROM folders WHERE case_id = $1 ORDER BY depth ASC, path ASC",
        )
        .bind(case_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    async fn create(&self, data: &NewFolder) -> AppResult<FolderNode> {
        sqlx::query_as::<_, FolderNode>(
            "INSERT INTO folders (id, case_id, parent_id, name, path, depth) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.id)
        .bind(data.case_id)
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(&data.path)
        .bind(data.depth)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(PATH_CONSTRAINT) => {
                AppError::conflict(format!("Folder path '{}' already exists", data.path))
            }
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(PARENT_CONSTRAINT) =>
            {
                AppError::not_found(format!("Parent of '{}' no longer exists", data.path))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })
    }

    async fn seed_roots(&self, case_id: CaseId, roots: &[NewFolder]) -> AppResult<SeedOutcome> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let existing: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM folders WHERE case_id = $1 AND parent_id IS NULL",
        )
        .bind(case_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count roots", e))?;

        let mut created = 0u64;
        if existing == 0 {
            for root in roots {
                // A concurrent initializer blocks here on the unique index
                // and then skips the row it already inserted.
                let result = sqlx::query(
                    "INSERT INTO folders (id, case_id, parent_id, name, path, depth) \
                     VALUES ($1, $2, NULL, $3, $4, 0) \
                     ON CONFLICT ON CONSTRAINT folders_case_id_path_key DO NOTHING",
                )
                .bind(root.id)
                .bind(case_id)
                .bind(&root.name)
                .bind(&root.path)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to seed root folder", e)
                })?;
                created += result.rows_affected();
            }
        }

        let roots = sqlx::query_as::<_, FolderNode>(
            "SELECT * FROM folders WHERE case_id = $1 AND parent_id IS NULL \
             ORDER BY LOWER(name) ASC, name ASC",
        )
        .bind(case_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list roots", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit root seeding", e)
        })?;

        Ok(SeedOutcome { roots, created })
    }

    async fn delete(
        &self,
        case_id: CaseId,
        id: FolderId,
        force: bool,
    ) -> AppResult<DeletedSubtree> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let target = sqlx::query_as::<_, FolderNode>(
            "SELECT * FROM folders WHERE case_id = $1 AND id = $2 FOR UPDATE",
        )
        .bind(case_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        if !force {
            let (children, live_files): (i64, i64) = sqlx::query_as(
                "SELECT \
                    (SELECT COUNT(*) FROM folders WHERE parent_id = $1), \
                    (SELECT COUNT(*) FROM files WHERE folder_id = $1 \
                        AND status IN ('pending', 'committed'))",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to inspect folder", e)
            })?;

            if children > 0 || live_files > 0 {
                return Err(AppError::conflict(format!(
                    "Folder '{}' is not empty ({children} folders, {live_files} files)",
                    target.path
                )));
            }
        }

        // Locking every folder of the subtree first serializes with commits,
        // which take a share lock on their folder.
        let subtree: Vec<Uuid> = sqlx::query_scalar(
            "WITH RECURSIVE subtree AS ( \
                SELECT id FROM folders WHERE id = $1 \
                UNION ALL \
                SELECT f.id FROM folders f INNER JOIN subtree s ON f.parent_id = s.id \
             ) SELECT id FROM folders WHERE id IN (SELECT id FROM subtree) FOR UPDATE",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock subtree", e))?;

        let orphaned_committed = sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM files WHERE folder_id = ANY($1) AND status = 'committed' FOR UPDATE",
        )
        .bind(&subtree)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to collect subtree files", e)
        })?;

        let orphaned = sqlx::query(
            "UPDATE files SET status = 'orphaned', updated_at = NOW() \
             WHERE folder_id = ANY($1) AND status IN ('pending', 'committed')",
        )
        .bind(&subtree)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to orphan files", e))?
        .rows_affected();

        let removed = sqlx::query("DELETE FROM folders WHERE id = ANY($1)")
            .bind(&subtree)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folders", e)
            })?
            .rows_affected();

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder deletion", e)
        })?;

        debug!(case_id = %case_id, path = %target.path, removed, orphaned, "Deleted folder subtree");

        let orphaned_pending = orphaned.saturating_sub(orphaned_committed.len() as u64);
        Ok(DeletedSubtree {
            removed_folders: removed,
            orphaned_committed,
            orphaned_pending,
        })
    }

    async fn count(&self, case_id: CaseId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE case_id = $1")
            .bind(case_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count folders", e))?;
        Ok(count as u64)
    }
}
