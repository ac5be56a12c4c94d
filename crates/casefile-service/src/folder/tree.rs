//! Whole-case folder tree.

use std::sync::Arc;

use casefile_core::result::AppResult;
use casefile_core::types::CaseId;
use casefile_database::store::FolderStore;
use casefile_entity::folder::FolderTree;

/// Builds nested folder trees.
#[derive(Debug, Clone)]
pub struct TreeService {
    folders: Arc<dyn FolderStore>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(folders: Arc<dyn FolderStore>) -> Self {
        Self { folders }
    }

    /// Every folder of the case from one store read, nested under its roots.
    pub async fn get_tree(&self, case_id: CaseId) -> AppResult<FolderTree> {
        let folders = self.folders.find_all(case_id).await?;
        if folders.is_empty() {
            return Ok(FolderTree::empty());
        }
        Ok(FolderTree::from_flat(folders))
    }
}
