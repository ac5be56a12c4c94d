//! Default folder taxonomy seeding for new cases.

use std::sync::Arc;

use tracing::info;

use casefile_core::path;
use casefile_core::result::AppResult;
use casefile_core::types::{CaseId, FolderId};
use casefile_database::store::FolderStore;
use casefile_entity::folder::tree::sort_by_name;
use casefile_entity::folder::{FolderNode, NewFolder};

use crate::context::RequestContext;
use crate::stats::{StatsAggregator, StatsDelta};

/// Revision of [`DEFAULT_TAXONOMY`]. Bump when the list changes.
pub const TAXONOMY_VERSION: u32 = 1;

/// Root folders every case starts with.
pub const DEFAULT_TAXONOMY: &[&str] = &[
    "Correspondence",
    "Court Documents",
    "Creditor Documents",
    "Financial Statements",
    "Generated Letters",
    "Identification",
    "Income and Expenditure",
];

/// Seeds the default root folders of a case.
#[derive(Debug, Clone)]
pub struct CaseInitializer {
    folders: Arc<dyn FolderStore>,
    stats: Arc<StatsAggregator>,
}

impl CaseInitializer {
    /// Creates a new initializer.
    pub fn new(folders: Arc<dyn FolderStore>, stats: Arc<StatsAggregator>) -> Self {
        Self { folders, stats }
    }

    /// Ensure the case has root folders and return them, sorted by name.
    ///
    /// A case that already has any root folder is left untouched, so
    /// repeated and concurrent calls all return the same set.
    pub async fn initialize(
        &self,
        ctx: &RequestContext,
        case_id: CaseId,
    ) -> AppResult<Vec<FolderNode>> {
        let roots = DEFAULT_TAXONOMY
            .iter()
            .map(|name| {
                Ok(NewFolder {
                    id: FolderId::new(),
                    case_id,
                    parent_id: None,
                    name: (*name).to_string(),
                    path: path::normalize(name)?,
                    depth: 0,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let permit = self.stats.begin(case_id).await;
        let outcome = self.folders.seed_roots(case_id, &roots).await?;
        permit.apply(StatsDelta::folders_created(outcome.created));
        drop(permit);

        if outcome.created > 0 {
            info!(
                case_id = %case_id,
                created = outcome.created,
                taxonomy_version = TAXONOMY_VERSION,
                advisor = %ctx.advisor_id,
                "Case folders initialized"
            );
        }

        let mut roots = outcome.roots;
        sort_by_name(&mut roots);
        Ok(roots)
    }
}
