//! Substring and tag search over committed files.

use std::sync::Arc;

use casefile_core::result::AppResult;
use casefile_core::types::CaseId;
use casefile_database::store::FileStore;
use casefile_entity::file::FileRecord;

/// Answers search queries for a case.
#[derive(Debug, Clone)]
pub struct SearchService {
    files: Arc<dyn FileStore>,
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(files: Arc<dyn FileStore>) -> Self {
        Self { files }
    }

    /// Files of `case_id` matching `query`.
    ///
    /// A blank query matches nothing and does not touch the store. Otherwise
    /// the committed records are snapshotted once and filtered lazily on
    /// each iteration.
    pub async fn search(&self, case_id: CaseId, query: &str) -> AppResult<SearchResults> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(SearchResults::empty());
        }
        let records = self.files.list_committed(case_id).await?;
        Ok(SearchResults {
            records: records.into(),
            needle,
        })
    }
}

/// A restartable view of the records matching one query.
#[derive(Debug, Clone)]
pub struct SearchResults {
    records: Arc<[FileRecord]>,
    needle: String,
}

impl SearchResults {
    /// Results of a blank query.
    pub fn empty() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            needle: String::new(),
        }
    }

    /// Iterate the matches, newest upload first.
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> + '_ {
        self.records
            .iter()
            .filter(move |record| !self.needle.is_empty() && matches(record, &self.needle))
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Collect the matches.
    pub fn into_vec(self) -> Vec<FileRecord> {
        self.iter().cloned().collect()
    }
}

/// `needle` must already be lower-cased.
fn matches(record: &FileRecord, needle: &str) -> bool {
    record.original_filename.to_lowercase().contains(needle)
        || record.has_tag(needle)
        || record
            .document_category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(needle))
}
