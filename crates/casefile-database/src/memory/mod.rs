//! In-process metadata store.
//!
//! Each case owns a [`CaseTables`] behind its own async `RwLock`, so
//! writers to different cases never contend and every trait method runs as
//! one critical section over its case. Used by development setups and the
//! test-suite.

mod tables;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;
use tracing::debug;

use casefile_core::error::AppError;
use casefile_core::result::AppResult;
use casefile_core::types::{CaseId, FileId, FolderId};
use casefile_entity::file::{FileRecord, FileStatus, NewFileRecord};
use casefile_entity::folder::{FolderNode, NewFolder};

use crate::store::{
    CommitOutcome, DeletedSubtree, FileAggregate, FileStore, FolderStore, SeedOutcome,
};

use self::tables::CaseTables;

type CaseHandle = Arc<RwLock<CaseTables>>;

/// Folder and file tables for every case, held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cases: DashMap<CaseId, CaseHandle>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables of an existing case.
    fn existing(&self, case_id: CaseId) -> Option<CaseHandle> {
        self.cases.get(&case_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Tables of a case, created on first write.
    fn tables(&self, case_id: CaseId) -> CaseHandle {
        Arc::clone(self.cases.entry(case_id).or_default().value())
    }

    /// Snapshot of every case handle; no map guard is held afterwards.
    fn all_cases(&self) -> Vec<CaseHandle> {
        self.cases.iter().map(|entry| Arc::clone(entry.value())).collect()
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn find_by_id(&self, case_id: CaseId, id: FolderId) -> AppResult<Option<FolderNode>> {
        let Some(handle) = self.existing(case_id) else {
            return Ok(None);
        };
        let tables = handle.read().await;
        Ok(tables.folder(id).cloned())
    }

    async fn find_by_path(&self, case_id: CaseId, path: &str) -> AppResult<Option<FolderNode>> {
        let Some(handle) = self.existing(case_id) else {
            return Ok(None);
        };
        let tables = handle.read().await;
        Ok(tables.folder_by_path(path).cloned())
    }

    async fn find_children(
        &self,
        case_id: CaseId,
        parent_id: Option<FolderId>,
    ) -> AppResult<Vec<FolderNode>> {
        let Some(handle) = self.existing(case_id) else {
            return Ok(Vec::new());
        };
        let tables = handle.read().await;
        Ok(tables.children_of(parent_id).cloned().collect())
    }

    async fn find_all(&self, case_id: CaseId) -> AppResult<Vec<FolderNode>> {
        let Some(handle) = self.existing(case_id) else {
            return Ok(Vec::new());
        };
        let tables = handle.read().await;
        Ok(tables.folders.values().cloned().collect())
    }

    async fn create(&self, data: &NewFolder) -> AppResult<FolderNode> {
        let handle = self.tables(data.case_id);
        let mut tables = handle.write().await;

        if let Some(parent) = data.parent_id
            && tables.folder(parent).is_none()
        {
            return Err(AppError::not_found(format!(
                "Parent of '{}' no longer exists",
                data.path
            )));
        }
        if tables.folder_by_path(&data.path).is_some() {
            return Err(AppError::conflict(format!(
                "Folder path '{}' already exists",
                data.path
            )));
        }

        let node = data.clone().into_node(Utc::now());
        tables.insert_folder(node.clone());
        Ok(node)
    }

    async fn seed_roots(&self, case_id: CaseId, roots: &[NewFolder]) -> AppResult<SeedOutcome> {
        let handle = self.tables(case_id);
        let mut tables = handle.write().await;

        let mut created = 0u64;
        if tables.children_of(None).next().is_none() {
            let now = Utc::now();
            for root in roots {
                if tables.folder_by_path(&root.path).is_none() {
                    tables.insert_folder(root.clone().into_node(now));
                    created += 1;
                }
            }
        }

        Ok(SeedOutcome {
            roots: tables.children_of(None).cloned().collect(),
            created,
        })
    }

    async fn delete(
        &self,
        case_id: CaseId,
        id: FolderId,
        force: bool,
    ) -> AppResult<DeletedSubtree> {
        let not_found = || AppError::not_found(format!("Folder {id} not found"));
        let handle = self.existing(case_id).ok_or_else(not_found)?;
        let mut tables = handle.write().await;

        let target = tables.folder(id).cloned().ok_or_else(not_found)?;

        if !force {
            let children = tables.children_of(Some(id)).count();
            let live_files = tables
                .files
                .values()
                .filter(|f| f.folder_id == id && f.status.is_live())
                .count();
            if children > 0 || live_files > 0 {
                return Err(AppError::conflict(format!(
                    "Folder '{}' is not empty ({children} folders, {live_files} files)",
                    target.path
                )));
            }
        }

        let subtree = tables.subtree_ids(id);
        let now = Utc::now();
        let mut outcome = DeletedSubtree::default();
        for file in tables.files.values_mut() {
            if !subtree.contains(&file.folder_id) {
                continue;
            }
            match file.status {
                FileStatus::Committed => outcome.orphaned_committed.push(file.clone()),
                FileStatus::Pending => outcome.orphaned_pending += 1,
                FileStatus::Orphaned => continue,
            }
            file.status = FileStatus::Orphaned;
            file.updated_at = now;
        }
        for folder_id in &subtree {
            tables.remove_folder(*folder_id);
        }
        outcome.removed_folders = subtree.len() as u64;

        debug!(
            case_id = %case_id,
            path = %target.path,
            removed = outcome.removed_folders,
            "Deleted folder subtree"
        );
        Ok(outcome)
    }

    async fn count(&self, case_id: CaseId) -> AppResult<u64> {
        let Some(handle) = self.existing(case_id) else {
            return Ok(0);
        };
        let tables = handle.read().await;
        Ok(tables.folders.len() as u64)
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn create_pending(&self, data: &NewFileRecord) -> AppResult<FileRecord> {
        let not_found = || {
            AppError::not_found(format!(
                "Folder {} not found in case {}",
                data.folder_id, data.case_id
            ))
        };
        let handle = self.existing(data.case_id).ok_or_else(not_found)?;
        let mut tables = handle.write().await;
        if tables.folder(data.folder_id).is_none() {
            return Err(not_found());
        }

        let record = data.clone().into_pending(Utc::now());
        tables.files.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, case_id: CaseId, id: FileId) -> AppResult<Option<FileRecord>> {
        let Some(handle) = self.existing(case_id) else {
            return Ok(None);
        };
        let tables = handle.read().await;
        Ok(tables.files.get(&id).cloned())
    }

    async fn commit(&self, case_id: CaseId, id: FileId) -> AppResult<CommitOutcome> {
        let not_found = || AppError::not_found(format!("File {id} not found"));
        let handle = self.existing(case_id).ok_or_else(not_found)?;
        let mut tables = handle.write().await;

        let (status, folder_id) = tables
            .files
            .get(&id)
            .map(|f| (f.status, f.folder_id))
            .ok_or_else(not_found)?;

        if status == FileStatus::Committed {
            let record = tables.files.get(&id).cloned().ok_or_else(not_found)?;
            return Ok(CommitOutcome {
                record,
                transitioned: false,
            });
        }
        if tables.folder(folder_id).is_none() {
            return Err(AppError::not_found(format!(
                "Folder of file {id} was deleted"
            )));
        }

        tables.adjust_file_count(folder_id, 1);
        let record = tables.files.get_mut(&id).ok_or_else(not_found)?;
        record.status = FileStatus::Committed;
        record.updated_at = Utc::now();

        Ok(CommitOutcome {
            record: record.clone(),
            transitioned: true,
        })
    }

    async fn mark_orphaned(&self, case_id: CaseId, id: FileId) -> AppResult<bool> {
        let Some(handle) = self.existing(case_id) else {
            return Ok(false);
        };
        let mut tables = handle.write().await;
        match tables.files.get_mut(&id) {
            Some(record) if record.status == FileStatus::Pending => {
                record.status = FileStatus::Orphaned;
                record.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_committed_in_folder(
        &self,
        case_id: CaseId,
        folder_id: FolderId,
    ) -> AppResult<Vec<FileRecord>> {
        let Some(handle) = self.existing(case_id) else {
            return Ok(Vec::new());
        };
        let tables = handle.read().await;
        Ok(tables.committed(|f| f.folder_id == folder_id))
    }

    async fn list_committed(&self, case_id: CaseId) -> AppResult<Vec<FileRecord>> {
        let Some(handle) = self.existing(case_id) else {
            return Ok(Vec::new());
        };
        let tables = handle.read().await;
        Ok(tables.committed(|_| true))
    }

    async fn update_tags(
        &self,
        case_id: CaseId,
        id: FileId,
        tags: &[String],
    ) -> AppResult<Option<FileRecord>> {
        let Some(handle) = self.existing(case_id) else {
            return Ok(None);
        };
        let mut tables = handle.write().await;
        Ok(tables.update_committed(id, |record| record.tags = tags.to_vec()))
    }

    async fn update_category(
        &self,
        case_id: CaseId,
        id: FileId,
        category: Option<&str>,
    ) -> AppResult<Option<FileRecord>> {
        let Some(handle) = self.existing(case_id) else {
            return Ok(None);
        };
        let mut tables = handle.write().await;
        Ok(tables.update_committed(id, |record| {
            record.document_category = category.map(str::to_string)
        }))
    }

    async fn orphan_stale_pending(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let now = Utc::now();
        let mut orphaned = 0u64;
        for handle in self.all_cases() {
            let mut tables = handle.write().await;
            for record in tables.files.values_mut() {
                if record.status == FileStatus::Pending && record.uploaded_at < cutoff {
                    record.status = FileStatus::Orphaned;
                    record.updated_at = now;
                    orphaned += 1;
                }
            }
        }
        Ok(orphaned)
    }

    async fn find_orphaned(&self, limit: i64) -> AppResult<Vec<FileRecord>> {
        let mut orphaned = Vec::new();
        for handle in self.all_cases() {
            let tables = handle.read().await;
            orphaned.extend(
                tables
                    .files
                    .values()
                    .filter(|f| f.status == FileStatus::Orphaned)
                    .cloned(),
            );
        }
        orphaned.sort_by_key(|f| f.updated_at);
        orphaned.truncate(limit.max(0) as usize);
        Ok(orphaned)
    }

    async fn purge_orphaned(&self, case_id: CaseId, id: FileId) -> AppResult<bool> {
        let Some(handle) = self.existing(case_id) else {
            return Ok(false);
        };
        let mut tables = handle.write().await;
        if tables
            .files
            .get(&id)
            .is_some_and(|f| f.status == FileStatus::Orphaned)
        {
            tables.files.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn aggregate(&self, case_id: CaseId) -> AppResult<FileAggregate> {
        let Some(handle) = self.existing(case_id) else {
            return Ok(FileAggregate::default());
        };
        let tables = handle.read().await;
        Ok(tables
            .files
            .values()
            .filter(|f| f.status == FileStatus::Committed)
            .fold(FileAggregate::default(), |mut acc, f| {
                acc.files += 1;
                acc.bytes += f.size_bytes as u64;
                acc.generated += u64::from(f.is_generated);
                acc
            }))
    }
}

#[cfg(test)]
mod tests;
