//! Local filesystem blob store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use casefile_core::error::{AppError, ErrorKind};
use casefile_core::result::AppResult;
use casefile_core::traits::storage::{BlobStore, ByteStream};

/// Stores each blob as a file under a root directory.
///
/// Writes go to a uniquely named temporary file next to the target and are
/// renamed into place only after the stream ends and the file is synced, so
/// readers never observe a partial blob.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a store rooted at `root_path`, creating the directory if needed.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Map a key to a path inside the root.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let clean = key.trim_start_matches('/');
        if clean.is_empty() || clean.split('/').any(|seg| seg.is_empty() || seg == "..") {
            return Err(AppError::validation(format!("Invalid blob key: {key}")));
        }
        Ok(self.root.join(clean))
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    async fn write_temp(&self, temp: &Path, mut stream: ByteStream) -> AppResult<u64> {
        let mut file = fs::File::create(temp).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to create temp file", e)
        })?;

        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Stream read error", e))?;
            total_bytes += chunk.len() as u64;
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write chunk", e)
            })?;
        }

        file.sync_all()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to sync blob", e))?;
        Ok(total_bytes)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn put(&self, key: &str, stream: ByteStream) -> AppResult<u64> {
        let target = self.resolve(key)?;
        self.ensure_parent(&target).await?;

        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp = target.with_file_name(format!(".{file_name}.{}.part", uuid::Uuid::new_v4()));

        // Dropping this future mid-write leaves only the `.part` file,
        // which `TempGuard` removes.
        let guard = TempGuard(Some(temp.clone()));
        let written = self.write_temp(&temp, stream).await?;

        fs::rename(&temp, &target).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to publish blob: {key}"),
                e,
            )
        })?;
        guard.disarm();

        debug!(key, bytes = written, "Wrote blob");
        Ok(written)
    }

    async fn get(&self, key: &str) -> AppResult<ByteStream> {
        let path = self.resolve(key)?;
        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {key}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to open blob: {key}"), e)
            }
        })?;

        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {key}"),
                e,
            )),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.resolve(key)?;
        fs::try_exists(&path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to stat blob: {key}"), e)
        })
    }
}

/// Removes a temporary file unless disarmed.
struct TempGuard(Option<PathBuf>);

impl TempGuard {
    fn disarm(mut self) {
        self.0 = None;
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take()
            && let Err(e) = std::fs::remove_file(&path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %path.display(), error = %e, "Failed to remove partial blob");
        }
    }
}
