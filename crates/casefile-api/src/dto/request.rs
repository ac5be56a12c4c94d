//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Parent folder path; absent for a root folder.
    pub parent: Option<String>,
    /// Display name of the new folder.
    #[validate(length(min = 1, max = 255, message = "Folder name must be 1-255 characters"))]
    pub name: String,
}

/// Replace-tags request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TagsRequest {
    /// The complete new tag set.
    #[validate(length(max = 50, message = "At most 50 tags"))]
    pub tags: Vec<String>,
}

/// Set-category request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    /// New category; null or blank clears it.
    pub category: Option<String>,
}

/// `?parent=` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentQuery {
    /// Parent folder path; roots when absent.
    pub parent: Option<String>,
}

/// `?path=` query.
#[derive(Debug, Clone, Deserialize)]
pub struct PathQuery {
    /// Folder path.
    pub path: String,
}

/// Delete folder query.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteFolderQuery {
    /// Folder path.
    pub path: String,
    /// Remove a non-empty folder and orphan its files.
    #[serde(default)]
    pub force: bool,
}

/// `?folder=` query.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderQuery {
    /// Folder path.
    pub folder: String,
}

/// Upload metadata, carried in the query string next to a raw body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UploadQuery {
    /// Target folder path.
    pub folder: String,
    /// Original file name.
    #[validate(length(min = 1, max = 255, message = "filename must be 1-255 characters"))]
    pub filename: String,
    /// Produced by the system.
    #[serde(default)]
    pub generated: bool,
    /// Document category.
    pub category: Option<String>,
    /// Comma-separated tags.
    pub tags: Option<String>,
}

impl UploadQuery {
    /// Split the comma-separated tag list.
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(|t| t.split(',').map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// `?q=` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// Search text.
    #[serde(default)]
    pub q: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_tag_list() {
        let query = UploadQuery {
            folder: "correspondence".to_string(),
            filename: "a.pdf".to_string(),
            generated: false,
            category: None,
            tags: Some("bank, January,,".to_string()),
        };
        assert_eq!(query.tag_list(), vec!["bank", " January", "", ""]);
    }

    #[test]
    fn test_create_folder_validation() {
        let req = CreateFolderRequest {
            parent: None,
            name: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
