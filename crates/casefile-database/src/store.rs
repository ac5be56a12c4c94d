//! Metadata store contracts.
//!
//! Every operation is scoped by [`CaseId`]; a folder or file of another case
//! behaves exactly like a missing one. Implementations must make each method
//! atomic on its own: path uniqueness, root seeding, subtree deletion, and
//! commit are each a single indivisible step.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use casefile_core::result::AppResult;
use casefile_core::types::{CaseId, FileId, FolderId};
use casefile_entity::file::{FileRecord, NewFileRecord};
use casefile_entity::folder::{FolderNode, NewFolder};

/// Result of seeding the root folders of a case.
#[derive(Debug, Clone)]
pub struct SeedOutcome {
    /// The case's root folders after seeding.
    pub roots: Vec<FolderNode>,
    /// How many folders this call inserted.
    pub created: u64,
}

/// Result of deleting a folder subtree.
#[derive(Debug, Clone, Default)]
pub struct DeletedSubtree {
    /// Number of folders removed, the target included.
    pub removed_folders: u64,
    /// Records that were committed before being orphaned.
    pub orphaned_committed: Vec<FileRecord>,
    /// Number of pending records that were orphaned.
    pub orphaned_pending: u64,
}

/// Result of committing a file record.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    /// The record, now committed.
    pub record: FileRecord,
    /// `false` when the record was already committed.
    pub transitioned: bool,
}

/// Totals over the committed records of one case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileAggregate {
    /// Committed records.
    pub files: u64,
    /// Bytes across committed records.
    pub bytes: u64,
    /// Committed records produced by the system.
    pub generated: u64,
}

/// Folder tree persistence.
#[async_trait]
pub trait FolderStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a folder by ID within a case.
    async fn find_by_id(&self, case_id: CaseId, id: FolderId) -> AppResult<Option<FolderNode>>;

    /// Find a folder by canonical path within a case.
    async fn find_by_path(&self, case_id: CaseId, path: &str) -> AppResult<Option<FolderNode>>;

    /// List the direct children of `parent_id` (roots when `None`).
    async fn find_children(
        &self,
        case_id: CaseId,
        parent_id: Option<FolderId>,
    ) -> AppResult<Vec<FolderNode>>;

    /// List every folder of a case.
    async fn find_all(&self, case_id: CaseId) -> AppResult<Vec<FolderNode>>;

    /// Insert a folder. Fails `Conflict` when the path is taken and
    /// `NotFound` when the parent has vanished.
    async fn create(&self, data: &NewFolder) -> AppResult<FolderNode>;

    /// Insert `roots` unless the case already has at least one root folder.
    /// Concurrent callers all observe the same root set.
    async fn seed_roots(&self, case_id: CaseId, roots: &[NewFolder]) -> AppResult<SeedOutcome>;

    /// Remove a folder. Without `force`, fails `Conflict` if the folder has
    /// children or pending/committed files. With `force`, removes the whole
    /// subtree and orphans every pending/committed file in it.
    async fn delete(&self, case_id: CaseId, id: FolderId, force: bool)
    -> AppResult<DeletedSubtree>;

    /// Count folders of a case.
    async fn count(&self, case_id: CaseId) -> AppResult<u64>;
}

/// File record persistence.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Write a pending record. Fails `NotFound` if the folder does not
    /// belong to the case.
    async fn create_pending(&self, data: &NewFileRecord) -> AppResult<FileRecord>;

    /// Find a record of any status.
    async fn find_by_id(&self, case_id: CaseId, id: FileId) -> AppResult<Option<FileRecord>>;

    /// Move a pending or orphaned record to committed if it still exists and
    /// its folder is live. Fails `NotFound` otherwise.
    async fn commit(&self, case_id: CaseId, id: FileId) -> AppResult<CommitOutcome>;

    /// Move a pending record to orphaned. Returns `false` if the record was
    /// not pending.
    async fn mark_orphaned(&self, case_id: CaseId, id: FileId) -> AppResult<bool>;

    /// Committed records of one folder, newest first.
    async fn list_committed_in_folder(
        &self,
        case_id: CaseId,
        folder_id: FolderId,
    ) -> AppResult<Vec<FileRecord>>;

    /// Committed records of a whole case, newest first.
    async fn list_committed(&self, case_id: CaseId) -> AppResult<Vec<FileRecord>>;

    /// Replace the tags of a committed record.
    async fn update_tags(
        &self,
        case_id: CaseId,
        id: FileId,
        tags: &[String],
    ) -> AppResult<Option<FileRecord>>;

    /// Set or clear the category of a committed record.
    async fn update_category(
        &self,
        case_id: CaseId,
        id: FileId,
        category: Option<&str>,
    ) -> AppResult<Option<FileRecord>>;

    /// Orphan every pending record uploaded before `cutoff`, across cases.
    async fn orphan_stale_pending(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Oldest orphaned records, across cases.
    async fn find_orphaned(&self, limit: i64) -> AppResult<Vec<FileRecord>>;

    /// Delete an orphaned record. Returns `false` if it was not orphaned.
    async fn purge_orphaned(&self, case_id: CaseId, id: FileId) -> AppResult<bool>;

    /// Totals over the committed records of a case.
    async fn aggregate(&self, case_id: CaseId) -> AppResult<FileAggregate>;
}
