//! In-memory blob store.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use dashmap::DashMap;
use futures::stream::StreamExt;

use casefile_core::error::{AppError, ErrorKind};
use casefile_core::result::AppResult;
use casefile_core::traits::storage::{BlobStore, ByteStream, stream_from_chunks};

/// Keeps blobs in a concurrent map. A blob becomes visible only after its
/// stream has been read to the end.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: DashMap<String, Bytes>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether no blobs are stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, key: &str, mut stream: ByteStream) -> AppResult<u64> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Stream read error", e))?;
            buffer.extend_from_slice(&chunk);
        }
        let written = buffer.len() as u64;
        self.blobs.insert(key.to_string(), buffer.freeze());
        Ok(written)
    }

    async fn get(&self, key: &str) -> AppResult<ByteStream> {
        let blob = self
            .blobs
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {key}")))?;
        Ok(stream_from_chunks(vec![blob]))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.blobs.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.blobs.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_partial_stream_is_not_stored() {
        let store = MemoryBlobStore::new();
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"abc")),
            Err(std::io::Error::other("reset")),
        ];
        assert!(store.put("k", Box::pin(futures::stream::iter(chunks))).await.is_err());
        assert!(store.is_empty());

        let written = store
            .put("k", stream_from_chunks(vec![Bytes::from_static(b"abc")]))
            .await
            .unwrap();
        assert_eq!(written, 3);
        assert!(store.exists("k").await.unwrap());
        store.delete("k").await.unwrap();
        assert_eq!(store.len(), 0);
    }
}
