//! Folder tree structures for hierarchical display.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use casefile_core::types::FolderId;

use super::model::FolderNode;

/// A node in a folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderTreeNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Full path.
    pub path: String,
    /// Depth level.
    pub depth: i32,
    /// Number of committed files directly in this folder.
    pub file_count: i64,
    /// Child folder nodes.
    pub children: Vec<FolderTreeNode>,
}

/// Every folder of a case, nested under its roots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderTree {
    /// The root node(s) of the tree.
    pub roots: Vec<FolderTreeNode>,
    /// Total number of folders in the tree.
    pub total_folders: u64,
}

impl FolderTree {
    /// Create an empty folder tree.
    pub fn empty() -> Self {
        Self {
            roots: Vec::new(),
            total_folders: 0,
        }
    }

    /// Assemble a tree from a flat list of folders.
    ///
    /// Children are grouped by parent id and each level is ordered by name,
    /// case-insensitively. Folders whose parent is not in the list are
    /// dropped.
    pub fn from_flat(folders: Vec<FolderNode>) -> Self {
        let total_folders = folders.len() as u64;
        let mut by_parent: HashMap<Option<FolderId>, Vec<FolderNode>> = HashMap::new();
        for folder in folders {
            by_parent.entry(folder.parent_id).or_default().push(folder);
        }

        let roots = build_level(None, &mut by_parent);
        Self {
            roots,
            total_folders,
        }
    }
}

fn build_level(
    parent: Option<FolderId>,
    by_parent: &mut HashMap<Option<FolderId>, Vec<FolderNode>>,
) -> Vec<FolderTreeNode> {
    let mut level = by_parent.remove(&parent).unwrap_or_default();
    sort_by_name(&mut level);
    level
        .into_iter()
        .map(|folder| {
            let children = build_level(Some(folder.id), by_parent);
            FolderTreeNode {
                id: folder.id,
                name: folder.name,
                path: folder.path,
                depth: folder.depth,
                file_count: folder.file_count,
                children,
            }
        })
        .collect()
}

/// Order folders by name, case-insensitively, ties broken by exact name.
pub fn sort_by_name(folders: &mut [FolderNode]) {
    folders.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folder::model::NewFolder;
    use casefile_core::types::CaseId;
    use chrono::Utc;

    fn folder(name: &str, path: &str, parent: Option<FolderId>, depth: i32) -> FolderNode {
        NewFolder {
            id: FolderId::new(),
            case_id: CaseId(1),
            parent_id: parent,
            name: name.into(),
            path: path.into(),
            depth,
        }
        .into_node(Utc::now())
    }

    #[test]
    fn test_from_flat_nests_and_sorts() {
        let financial = folder("Financial", "financial", None, 0);
        let correspondence = folder("correspondence", "correspondence", None, 0);
        let statements = folder("Statements", "financial/statements", Some(financial.id), 1);
        let year = folder("2023", "financial/statements/2023", Some(statements.id), 2);

        let tree = FolderTree::from_flat(vec![
            year.clone(),
            statements.clone(),
            financial.clone(),
            correspondence.clone(),
        ]);

        assert_eq!(tree.total_folders, 4);
        assert_eq!(tree.roots.len(), 2);
        assert_eq!(tree.roots[0].name, "correspondence");
        assert_eq!(tree.roots[1].name, "Financial");
        assert_eq!(tree.roots[1].children[0].id, statements.id);
        assert_eq!(tree.roots[1].children[0].children[0].path, year.path);
    }

    #[test]
    fn test_empty_tree() {
        let tree = FolderTree::from_flat(Vec::new());
        assert!(tree.roots.is_empty());
        assert_eq!(tree.total_folders, FolderTree::empty().total_folders);
    }
}
