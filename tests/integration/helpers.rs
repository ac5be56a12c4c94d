//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use casefile_api::AppState;
use casefile_core::config::AppConfig;
use casefile_core::error::AppError;
use casefile_core::result::AppResult;
use casefile_core::traits::storage::{BlobStore, ByteStream};
use casefile_database::MemoryStore;
use casefile_service::Filestore;
use casefile_storage::MemoryBlobStore;

/// Advisor header used by the helpers.
pub const ADVISOR: &str = "adv-test";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Metadata store behind the router
    pub store: Arc<MemoryStore>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application over in-memory stores
    pub fn new() -> Self {
        Self::with_blobs(Arc::new(MemoryBlobStore::new()))
    }

    /// Create a test application over the given blob store
    pub fn with_blobs(blobs: Arc<dyn BlobStore>) -> Self {
        let mut config = AppConfig::default();
        config.storage.max_upload_size_bytes = 1024;

        let store = Arc::new(MemoryStore::new());
        let filestore = Filestore::new(store.clone(), store.clone(), blobs, &config.storage);
        let router = casefile_api::build_app(AppState::new(config.clone(), filestore));

        Self {
            router,
            store,
            config,
        }
    }

    /// Seed the default folders of `case_id`
    pub async fn initialize(&self, case_id: i64) -> TestResponse {
        self.request("POST", &format!("/api/cases/{case_id}/initialize"), None)
            .await
    }

    /// Make a JSON request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("X-Advisor-Id", ADVISOR)
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload `content` into `folder` of `case_id`
    pub async fn upload(
        &self,
        case_id: i64,
        folder: &str,
        filename: &str,
        mime: &str,
        content: impl AsRef<[u8]>,
    ) -> TestResponse {
        self.upload_with_query(
            case_id,
            &format!("folder={folder}&filename={filename}"),
            mime,
            content,
        )
        .await
    }

    /// Upload with a raw query string
    pub async fn upload_with_query(
        &self,
        case_id: i64,
        query: &str,
        mime: &str,
        content: impl AsRef<[u8]>,
    ) -> TestResponse {
        let content = Bytes::copy_from_slice(content.as_ref());
        let req = Request::builder()
            .method("POST")
            .uri(format!("/api/cases/{case_id}/files?{query}"))
            .header("Content-Type", mime)
            .header("Content-Length", content.len())
            .header("X-Advisor-Id", ADVISOR)
            .body(Body::from(content))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// GET a path and return the raw body
    pub async fn get_bytes(&self, path: &str) -> (StatusCode, Bytes) {
        let req = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        (status, bytes)
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` code of an error body
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// Blob store whose writes always fail
#[derive(Debug)]
pub struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    fn provider_type(&self) -> &str {
        "failing"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }

    async fn put(&self, _key: &str, _stream: ByteStream) -> AppResult<u64> {
        Err(AppError::storage("blob backend unavailable"))
    }

    async fn get(&self, key: &str) -> AppResult<ByteStream> {
        Err(AppError::not_found(format!("Blob not found: {key}")))
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Ok(())
    }

    async fn exists(&self, _key: &str) -> AppResult<bool> {
        Ok(false)
    }
}
