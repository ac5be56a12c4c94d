//! Per-case usage counters.
//!
//! Counters are seeded lazily from a store recount and then kept current by
//! the services through [`StatsPermit`]s. Every store mutation that changes a
//! total runs while holding a permit (a shared lock on the case gate) and
//! applies its delta before releasing it. Seeding and reconciliation take
//! the gate exclusively, so a recount never races a half-applied mutation.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;
use tokio::sync::{OwnedRwLockReadGuard, RwLock};
use tracing::{debug, info};

use casefile_core::error::AppError;
use casefile_core::result::AppResult;
use casefile_core::types::CaseId;
use casefile_database::store::{DeletedSubtree, FileStore, FolderStore};
use casefile_entity::file::FileRecord;
use casefile_entity::stats::CaseStats;

/// Signed change to a case's totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsDelta {
    /// Change in committed files.
    pub files: i64,
    /// Change in committed bytes.
    pub bytes: i64,
    /// Change in folders.
    pub folders: i64,
    /// Change in committed generated files.
    pub generated: i64,
}

impl StatsDelta {
    /// `n` folders created.
    pub fn folders_created(n: u64) -> Self {
        Self {
            folders: n as i64,
            ..Self::default()
        }
    }

    /// One record became committed.
    pub fn committed(record: &FileRecord) -> Self {
        Self {
            files: 1,
            bytes: record.size_bytes,
            folders: 0,
            generated: i64::from(record.is_generated),
        }
    }

    /// A subtree was removed.
    pub fn removed(subtree: &DeletedSubtree) -> Self {
        let mut delta = Self {
            folders: -(subtree.removed_folders as i64),
            ..Self::default()
        };
        for record in &subtree.orphaned_committed {
            delta.files -= 1;
            delta.bytes -= record.size_bytes;
            delta.generated -= i64::from(record.is_generated);
        }
        delta
    }
}

#[derive(Debug, Default)]
struct CaseCounters {
    total_files: AtomicI64,
    total_size_bytes: AtomicI64,
    folder_count: AtomicI64,
    generated_files: AtomicI64,
}

impl CaseCounters {
    fn apply(&self, delta: StatsDelta) {
        self.total_files.fetch_add(delta.files, Ordering::AcqRel);
        self.total_size_bytes.fetch_add(delta.bytes, Ordering::AcqRel);
        self.folder_count.fetch_add(delta.folders, Ordering::AcqRel);
        self.generated_files.fetch_add(delta.generated, Ordering::AcqRel);
    }

    fn snapshot(&self, case_id: CaseId) -> CaseStats {
        let read = |c: &AtomicI64| c.load(Ordering::Acquire).max(0) as u64;
        CaseStats {
            case_id,
            total_files: read(&self.total_files),
            total_size_bytes: read(&self.total_size_bytes),
            folder_count: read(&self.folder_count),
            generated_files: read(&self.generated_files),
        }
    }
}

type Gate = Arc<RwLock<Option<CaseCounters>>>;

/// Shared hold on a case's counters for the duration of one mutation.
#[derive(Debug)]
pub struct StatsPermit {
    guard: OwnedRwLockReadGuard<Option<CaseCounters>>,
}

impl StatsPermit {
    /// Record the effect of the mutation performed under this permit.
    /// Unseeded cases ignore deltas; their first read recounts instead.
    pub fn apply(&self, delta: StatsDelta) {
        if let Some(counters) = self.guard.as_ref() {
            counters.apply(delta);
        }
    }
}

/// Maintains [`CaseStats`] for every case that has been read at least once.
#[derive(Debug)]
pub struct StatsAggregator {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    gates: DashMap<CaseId, Gate>,
}

impl StatsAggregator {
    /// Creates a new aggregator over the given stores.
    pub fn new(folders: Arc<dyn FolderStore>, files: Arc<dyn FileStore>) -> Self {
        Self {
            folders,
            files,
            gates: DashMap::new(),
        }
    }

    fn gate(&self, case_id: CaseId) -> Gate {
        Arc::clone(self.gates.entry(case_id).or_default().value())
    }

    /// Acquire a permit before mutating the stores of `case_id`.
    pub async fn begin(&self, case_id: CaseId) -> StatsPermit {
        StatsPermit {
            guard: self.gate(case_id).read_owned().await,
        }
    }

    /// Current totals, seeding from the stores on first use.
    ///
    /// Fails `NotFound` when the case has no folders.
    pub async fn get_stats(&self, case_id: CaseId) -> AppResult<CaseStats> {
        let gate = self.gate(case_id);
        {
            let counters = gate.read().await;
            if let Some(counters) = counters.as_ref() {
                let stats = counters.snapshot(case_id);
                if stats.folder_count > 0 {
                    return Ok(stats);
                }
            }
        }

        let mut counters = gate.write().await;
        if counters.is_none() {
            *counters = Some(self.recount(case_id).await?);
            debug!(case_id = %case_id, "Seeded case stats");
        }
        let stats = counters
            .as_ref()
            .map(|c| c.snapshot(case_id))
            .unwrap_or_else(|| CaseStats::zero(case_id));

        if stats.folder_count == 0 {
            *counters = None;
            drop(counters);
            self.gates.remove_if(&case_id, |_, g| Arc::strong_count(g) <= 2);
            return Err(AppError::not_found(format!("Case {case_id} has no folders")));
        }
        Ok(stats)
    }

    /// Replace the counters of a tracked case with a fresh recount.
    /// Returns `None` for cases that were never seeded.
    pub async fn reconcile(&self, case_id: CaseId) -> AppResult<Option<CaseStats>> {
        let Some(gate) = self.gates.get(&case_id).map(|g| Arc::clone(g.value())) else {
            return Ok(None);
        };
        let mut counters = gate.write().await;
        if counters.is_none() {
            return Ok(None);
        }

        let fresh = self.recount(case_id).await?;
        let stats = fresh.snapshot(case_id);
        if let Some(previous) = counters.as_ref().map(|c| c.snapshot(case_id))
            && previous != stats
        {
            info!(
                case_id = %case_id,
                cached_files = previous.total_files,
                actual_files = stats.total_files,
                "Corrected drifted case stats"
            );
        }
        *counters = Some(fresh);
        Ok(Some(stats))
    }

    /// Cases that currently have a gate. Unseeded ones are skipped by
    /// [`StatsAggregator::reconcile`].
    pub fn tracked_cases(&self) -> Vec<CaseId> {
        self.gates.iter().map(|entry| *entry.key()).collect()
    }

    async fn recount(&self, case_id: CaseId) -> AppResult<CaseCounters> {
        let folders = self.folders.count(case_id).await?;
        let files = self.files.aggregate(case_id).await?;
        let counters = CaseCounters::default();
        counters.apply(StatsDelta {
            files: files.files as i64,
            bytes: files.bytes as i64,
            folders: folders as i64,
            generated: files.generated as i64,
        });
        Ok(counters)
    }
}
