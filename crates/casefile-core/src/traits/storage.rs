//! Blob store trait for pluggable file byte storage.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading and writing file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for blob storage backends.
///
/// The filestore only ever addresses blobs by the opaque keys it generates
/// (`cases/{case_id}/{file_id}`). Implementations live in `casefile-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g. "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the backend is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write a byte stream under `key`, returning the number of bytes
    /// written. A failed write leaves no readable blob behind.
    async fn put(&self, key: &str, stream: ByteStream) -> AppResult<u64>;

    /// Read a blob as a byte stream.
    async fn get(&self, key: &str) -> AppResult<ByteStream>;

    /// Delete a blob. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a blob exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}

/// Build a [`ByteStream`] from in-memory chunks.
pub fn stream_from_chunks(chunks: Vec<Bytes>) -> ByteStream {
    Box::pin(futures::stream::iter(chunks.into_iter().map(Ok)))
}
