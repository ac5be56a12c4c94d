//! Per-case tables of the in-memory store.

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use casefile_core::types::{FileId, FolderId};
use casefile_entity::file::{FileRecord, FileStatus};
use casefile_entity::folder::FolderNode;

/// Folders keyed by id with a path index maintained alongside, plus every
/// file record of the case regardless of status.
#[derive(Debug, Default)]
pub(super) struct CaseTables {
    pub folders: HashMap<FolderId, FolderNode>,
    paths: HashMap<String, FolderId>,
    pub files: HashMap<FileId, FileRecord>,
}

impl CaseTables {
    pub fn folder(&self, id: FolderId) -> Option<&FolderNode> {
        self.folders.get(&id)
    }

    pub fn folder_by_path(&self, path: &str) -> Option<&FolderNode> {
        self.paths.get(path).and_then(|id| self.folders.get(id))
    }

    pub fn children_of(&self, parent: Option<FolderId>) -> impl Iterator<Item = &FolderNode> {
        self.folders.values().filter(move |f| f.parent_id == parent)
    }

    pub fn insert_folder(&mut self, node: FolderNode) {
        self.paths.insert(node.path.clone(), node.id);
        self.folders.insert(node.id, node);
    }

    pub fn remove_folder(&mut self, id: FolderId) {
        if let Some(node) = self.folders.remove(&id) {
            self.paths.remove(&node.path);
        }
    }

    /// The folder and all of its descendants.
    pub fn subtree_ids(&self, root: FolderId) -> HashSet<FolderId> {
        let mut found = HashSet::from([root]);
        let mut frontier = vec![root];
        while let Some(current) = frontier.pop() {
            for child in self.children_of(Some(current)) {
                if found.insert(child.id) {
                    frontier.push(child.id);
                }
            }
        }
        found
    }

    pub fn adjust_file_count(&mut self, folder_id: FolderId, delta: i64) {
        if let Some(folder) = self.folders.get_mut(&folder_id) {
            folder.file_count = (folder.file_count + delta).max(0);
        }
    }

    /// Committed records matching `filter`, newest first.
    pub fn committed(&self, filter: impl Fn(&FileRecord) -> bool) -> Vec<FileRecord> {
        let mut records: Vec<FileRecord> = self
            .files
            .values()
            .filter(|f| f.status == FileStatus::Committed && filter(f))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        records
    }

    /// Apply `change` to a committed record and bump its `updated_at`.
    pub fn update_committed(
        &mut self,
        id: FileId,
        change: impl FnOnce(&mut FileRecord),
    ) -> Option<FileRecord> {
        let record = self
            .files
            .get_mut(&id)
            .filter(|f| f.status == FileStatus::Committed)?;
        change(record);
        record.updated_at = Utc::now();
        Some(record.clone())
    }
}
