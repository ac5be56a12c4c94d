//! Folder tree operations scoped to a case.

use std::sync::Arc;

use tracing::info;

use casefile_core::error::AppError;
use casefile_core::path;
use casefile_core::result::AppResult;
use casefile_core::types::{CaseId, FolderId};
use casefile_database::store::FolderStore;
use casefile_entity::folder::tree::sort_by_name;
use casefile_entity::folder::{Breadcrumb, FolderNode, NewFolder};

use crate::context::RequestContext;
use crate::stats::{StatsAggregator, StatsDelta};

/// Summary of a folder deletion.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeleteFolderReport {
    /// Canonical path that was removed.
    pub path: String,
    /// Folders removed, the target included.
    pub removed_folders: u64,
    /// Files (pending or committed) orphaned by the deletion.
    pub orphaned_files: u64,
}

/// Creates, lists, resolves, and deletes folders.
#[derive(Debug, Clone)]
pub struct FolderService {
    folders: Arc<dyn FolderStore>,
    stats: Arc<StatsAggregator>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folders: Arc<dyn FolderStore>, stats: Arc<StatsAggregator>) -> Self {
        Self { folders, stats }
    }

    /// Resolve a caller-supplied path to its folder.
    pub async fn resolve_path(&self, case_id: CaseId, raw_path: &str) -> AppResult<FolderNode> {
        let canonical = path::canonicalize(raw_path)?;
        self.folders
            .find_by_path(case_id, &canonical)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Folder '{canonical}' not found in case {case_id}"))
            })
    }

    /// Resolve an optional parent path; `None` or a blank path means the root level.
    async fn resolve_parent(
        &self,
        case_id: CaseId,
        parent_path: Option<&str>,
    ) -> AppResult<Option<FolderNode>> {
        match parent_path.map(str::trim) {
            Some(raw) if !raw.trim_matches('/').is_empty() => {
                self.resolve_path(case_id, raw).await.map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Creates a folder under `parent_path` (or at the root level).
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        case_id: CaseId,
        parent_path: Option<&str>,
        name: &str,
    ) -> AppResult<FolderNode> {
        let slug = path::normalize(name)?;
        let parent = self.resolve_parent(case_id, parent_path).await?;

        let folder_path = path::join(parent.as_ref().map(|p| p.path.as_str()), &slug);
        let depth = path::depth(&folder_path);
        if depth > path::MAX_DEPTH {
            return Err(AppError::validation(format!(
                "Folders may be nested at most {} levels deep",
                path::MAX_DEPTH
            )));
        }

        let data = NewFolder {
            id: FolderId::new(),
            case_id,
            parent_id: parent.as_ref().map(|p| p.id),
            name: name.trim().to_string(),
            path: folder_path,
            depth,
        };

        let permit = self.stats.begin(case_id).await;
        let folder = self.folders.create(&data).await?;
        permit.apply(StatsDelta::folders_created(1));
        drop(permit);

        info!(
            case_id = %case_id,
            path = %folder.path,
            advisor = %ctx.advisor_id,
            "Folder created"
        );
        Ok(folder)
    }

    /// Lists the direct children of `parent_path` (roots when absent),
    /// ordered by name case-insensitively.
    pub async fn list_children(
        &self,
        case_id: CaseId,
        parent_path: Option<&str>,
    ) -> AppResult<Vec<FolderNode>> {
        let parent = self.resolve_parent(case_id, parent_path).await?;
        let mut children = self
            .folders
            .find_children(case_id, parent.map(|p| p.id))
            .await?;
        sort_by_name(&mut children);
        Ok(children)
    }

    /// Resolves every prefix of `raw_path` into a breadcrumb trail.
    pub async fn resolve_breadcrumbs(
        &self,
        case_id: CaseId,
        raw_path: &str,
    ) -> AppResult<Vec<Breadcrumb>> {
        let canonical = path::canonicalize(raw_path)?;
        let mut trail = Vec::new();
        for prefix in path::prefixes(&canonical) {
            let folder = self
                .folders
                .find_by_path(case_id, &prefix)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Folder '{prefix}' not found in case {case_id}"))
                })?;
            trail.push(Breadcrumb {
                name: folder.name,
                path: prefix,
            });
        }
        Ok(trail)
    }

    /// Deletes the folder at `raw_path`. Without `force` the folder must be
    /// empty; with `force` its subtree goes and its files are orphaned.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        case_id: CaseId,
        raw_path: &str,
        force: bool,
    ) -> AppResult<DeleteFolderReport> {
        let folder = self.resolve_path(case_id, raw_path).await?;

        let permit = self.stats.begin(case_id).await;
        let deleted = self.folders.delete(case_id, folder.id, force).await?;
        permit.apply(StatsDelta::removed(&deleted));
        drop(permit);

        let report = DeleteFolderReport {
            path: folder.path,
            removed_folders: deleted.removed_folders,
            orphaned_files: deleted.orphaned_committed.len() as u64 + deleted.orphaned_pending,
        };
        info!(
            case_id = %case_id,
            path = %report.path,
            force,
            removed_folders = report.removed_folders,
            orphaned_files = report.orphaned_files,
            advisor = %ctx.advisor_id,
            "Folder deleted"
        );
        Ok(report)
    }
}
