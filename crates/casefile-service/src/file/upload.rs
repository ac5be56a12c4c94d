//! Streamed uploads with a write-ahead record.
//!
//! An upload moves through [`UploadPhase`]s. The pending record is written
//! before any bytes move, so every blob the store ever holds is accounted
//! for by a record; whatever goes wrong afterwards (blob failure, timeout,
//! size mismatch, client disconnect) degrades the record to `orphaned` and
//! leaves reclamation to the sweep.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use futures::StreamExt;
use tracing::{info, warn};

use casefile_core::config::storage::StorageConfig;
use casefile_core::error::{AppError, ErrorKind};
use casefile_core::result::AppResult;
use casefile_core::traits::storage::{BlobStore, ByteStream};
use casefile_core::types::{CaseId, FileId};
use casefile_database::store::FileStore;
use casefile_entity::file::model::normalize_tags;
use casefile_entity::file::{FileRecord, NewFileRecord, UploadPhase};

use crate::context::RequestContext;
use crate::file::service::normalize_category;
use crate::folder::FolderService;
use crate::stats::{StatsAggregator, StatsDelta};

/// Maximum length of an uploaded file name.
const MAX_FILENAME_LEN: usize = 255;

/// Upload policy derived from storage configuration.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Largest accepted payload in bytes.
    pub max_size_bytes: u64,
    /// Accepted MIME types, lower-cased.
    pub allowed_mime_types: Vec<String>,
    /// Upper bound on one blob write.
    pub write_timeout: Duration,
}

impl UploadPolicy {
    /// Build the policy from the storage section.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            max_size_bytes: config.max_upload_size_bytes,
            allowed_mime_types: config
                .allowed_mime_types
                .iter()
                .map(|m| m.trim().to_lowercase())
                .collect(),
            write_timeout: Duration::from_secs(config.upload_timeout_seconds),
        }
    }
}

/// Metadata accompanying an upload body.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Target case.
    pub case_id: CaseId,
    /// Path of the target folder.
    pub folder_path: String,
    /// File name as supplied by the client.
    pub filename: String,
    /// Declared content type; parameters are ignored.
    pub mime_type: String,
    /// Declared body length in bytes.
    pub declared_size: u64,
    /// Produced by the system rather than an advisor.
    pub is_generated: bool,
    /// Optional category.
    pub document_category: Option<String>,
    /// Initial tags.
    pub tags: Vec<String>,
}

/// Runs the upload protocol.
#[derive(Debug, Clone)]
pub struct UploadService {
    files: Arc<dyn FileStore>,
    folders: Arc<FolderService>,
    blobs: Arc<dyn BlobStore>,
    stats: Arc<StatsAggregator>,
    policy: UploadPolicy,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        files: Arc<dyn FileStore>,
        folders: Arc<FolderService>,
        blobs: Arc<dyn BlobStore>,
        stats: Arc<StatsAggregator>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            files,
            folders,
            blobs,
            stats,
            policy,
        }
    }

    /// Store `body` as a new committed file.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        req: UploadRequest,
        body: ByteStream,
    ) -> AppResult<FileRecord> {
        // ── Validate before anything is written ──
        self.check_size(req.declared_size)?;
        let mime_type = self.check_mime(&req.mime_type)?;
        let filename = check_filename(&req.filename)?;
        let category = normalize_category(req.document_category.as_deref())?;
        let folder = self.folders.resolve_path(req.case_id, &req.folder_path).await?;

        // ── Write-ahead pending record ──
        let file_id = FileId::new();
        let key = FileRecord::object_key(req.case_id, file_id);
        let pending = self
            .files
            .create_pending(&NewFileRecord {
                id: file_id,
                case_id: req.case_id,
                folder_id: folder.id,
                original_filename: filename,
                stored_object_key: key.clone(),
                size_bytes: req.declared_size as i64,
                mime_type,
                uploaded_by: ctx.advisor_id.clone(),
                document_category: category,
                tags: normalize_tags(&req.tags),
                is_generated: req.is_generated,
            })
            .await?;
        log_phase(&pending, UploadPhase::Received);

        let guard = AbandonGuard::new(
            Arc::clone(&self.files),
            Arc::clone(&self.blobs),
            req.case_id,
            file_id,
            key.clone(),
        );

        // ── Stream to the blob store ──
        log_phase(&pending, UploadPhase::BlobWriting);
        let (metered, meter) = meter(body, self.policy.max_size_bytes);
        let written =
            match tokio::time::timeout(self.policy.write_timeout, self.blobs.put(&key, metered))
                .await
            {
                Ok(Ok(written)) => written,
                Ok(Err(e)) => {
                    let err = if meter.overflowed() {
                        AppError::payload_too_large(format!(
                            "Upload exceeds the {} byte limit",
                            self.policy.max_size_bytes
                        ))
                    } else if e.is(ErrorKind::Storage) {
                        e
                    } else {
                        AppError::storage(format!("Blob write failed: {e}"))
                    };
                    return Err(self.abandon(guard, &pending, err).await);
                }
                Err(_) => {
                    let err = AppError::storage(format!(
                        "Blob write timed out after {}s",
                        self.policy.write_timeout.as_secs()
                    ));
                    return Err(self.abandon(guard, &pending, err).await);
                }
            };

        if written != req.declared_size {
            let err = AppError::validation(format!(
                "Received {written} bytes but {} were declared",
                req.declared_size
            ));
            return Err(self.abandon(guard, &pending, err).await);
        }
        log_phase(&pending, UploadPhase::BlobConfirmed);

        // ── Commit ──
        let permit = self.stats.begin(req.case_id).await;
        let committed = match self.files.commit(req.case_id, file_id).await {
            Ok(outcome) => {
                if outcome.transitioned {
                    permit.apply(StatsDelta::committed(&outcome.record));
                }
                outcome.record
            }
            Err(e) => {
                drop(permit);
                return Err(self.abandon(guard, &pending, e).await);
            }
        };
        drop(permit);
        guard.disarm();

        log_phase(&committed, UploadPhase::Committed);
        info!(
            case_id = %committed.case_id,
            file_id = %committed.id,
            size_bytes = committed.size_bytes,
            advisor = %ctx.advisor_id,
            "File uploaded"
        );
        Ok(committed)
    }

    fn check_size(&self, declared: u64) -> AppResult<()> {
        if declared == 0 {
            return Err(AppError::validation("Upload must not be empty"));
        }
        if declared > self.policy.max_size_bytes {
            return Err(AppError::payload_too_large(format!(
                "Upload of {declared} bytes exceeds the {} byte limit",
                self.policy.max_size_bytes
            )));
        }
        Ok(())
    }

    fn check_mime(&self, raw: &str) -> AppResult<String> {
        let mime = normalize_mime(raw);
        if mime.is_empty() {
            return Err(AppError::validation("Content type is required"));
        }
        if !self.policy.allowed_mime_types.iter().any(|m| *m == mime) {
            return Err(AppError::validation(format!(
                "Content type '{mime}' is not allowed"
            )));
        }
        Ok(mime)
    }

    /// Orphan the record, drop the blob, and hand back `err`.
    async fn abandon(&self, guard: AbandonGuard, pending: &FileRecord, err: AppError) -> AppError {
        log_phase(pending, UploadPhase::BlobFailed);
        warn!(
            case_id = %pending.case_id,
            file_id = %pending.id,
            error = %err,
            "Upload failed"
        );

        match self.files.mark_orphaned(pending.case_id, pending.id).await {
            Ok(_) => log_phase(pending, UploadPhase::Orphaned),
            Err(e) => warn!(file_id = %pending.id, error = %e, "Failed to orphan record"),
        }
        // The guard covers a drop while the record is still being orphaned.
        guard.disarm();
        if let Err(e) = self.blobs.delete(&pending.stored_object_key).await {
            warn!(file_id = %pending.id, error = %e, "Failed to delete abandoned blob");
        }
        err
    }
}

fn log_phase(record: &FileRecord, phase: UploadPhase) {
    info!(
        case_id = %record.case_id,
        file_id = %record.id,
        phase = %phase,
        "Upload phase"
    );
}

/// Strip parameters and lower-case a content type.
pub fn normalize_mime(raw: &str) -> String {
    raw.split(';').next().unwrap_or_default().trim().to_lowercase()
}

fn check_filename(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation("File name cannot be empty"));
    }
    if name.chars().count() > MAX_FILENAME_LEN {
        return Err(AppError::validation(format!(
            "File name exceeds {MAX_FILENAME_LEN} characters"
        )));
    }
    if name.chars().any(|c| c.is_control() || c == '/' || c == '\\') {
        return Err(AppError::validation(
            "File name must not contain path separators or control characters",
        ));
    }
    Ok(name.to_string())
}

/// Byte count of a metered stream.
#[derive(Debug, Default)]
struct Meter {
    bytes: AtomicU64,
    overflow: AtomicBool,
}

impl Meter {
    fn overflowed(&self) -> bool {
        self.overflow.load(Ordering::Acquire)
    }
}

/// Wrap `body` so it fails as soon as more than `limit` bytes pass through.
fn meter(body: ByteStream, limit: u64) -> (ByteStream, Arc<Meter>) {
    let meter = Arc::new(Meter::default());
    let counter = Arc::clone(&meter);
    let stream = body.map(move |chunk| {
        let chunk = chunk?;
        let len = chunk.len() as u64;
        let total = counter.bytes.fetch_add(len, Ordering::AcqRel) + len;
        if total > limit {
            counter.overflow.store(true, Ordering::Release);
            return Err(std::io::Error::other(format!(
                "upload exceeds {limit} bytes"
            )));
        }
        Ok(chunk)
    });
    (Box::pin(stream), meter)
}

/// Orphans the record if the upload future is dropped before it settles.
struct AbandonGuard {
    armed: Option<(Arc<dyn FileStore>, Arc<dyn BlobStore>, CaseId, FileId, String)>,
}

impl AbandonGuard {
    fn new(
        files: Arc<dyn FileStore>,
        blobs: Arc<dyn BlobStore>,
        case_id: CaseId,
        file_id: FileId,
        key: String,
    ) -> Self {
        Self {
            armed: Some((files, blobs, case_id, file_id, key)),
        }
    }

    fn disarm(mut self) {
        self.armed = None;
    }
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        let Some((files, blobs, case_id, file_id, key)) = self.armed.take() else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(file_id = %file_id, "Upload cancelled outside a runtime; sweep will reclaim");
            return;
        };
        handle.spawn(async move {
            // Only a record this upload still owned may lose its blob.
            match files.mark_orphaned(case_id, file_id).await {
                Ok(true) => {
                    info!(case_id = %case_id, file_id = %file_id, phase = %UploadPhase::Orphaned, "Upload cancelled");
                    if let Err(e) = blobs.delete(&key).await {
                        warn!(file_id = %file_id, error = %e, "Failed to delete cancelled blob");
                    }
                }
                Ok(false) => {}
                Err(e) => warn!(file_id = %file_id, error = %e, "Failed to orphan cancelled upload"),
            }
        });
    }
}
