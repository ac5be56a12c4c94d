//! Case statistics snapshot.

use serde::{Deserialize, Serialize};

use casefile_core::types::CaseId;

/// Usage totals for one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStats {
    /// The case these totals describe.
    pub case_id: CaseId,
    /// Committed files.
    pub total_files: u64,
    /// Bytes across committed files.
    pub total_size_bytes: u64,
    /// Folders, roots included.
    pub folder_count: u64,
    /// Committed files produced by the system.
    pub generated_files: u64,
}

impl CaseStats {
    /// All-zero totals for a case.
    pub fn zero(case_id: CaseId) -> Self {
        Self {
            case_id,
            total_files: 0,
            total_size_bytes: 0,
            folder_count: 0,
            generated_files: 0,
        }
    }
}
