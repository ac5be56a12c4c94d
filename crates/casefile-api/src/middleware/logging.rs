//! Access log middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::extractors::advisor::ADVISOR_HEADER;

/// Emits one event per request, at `warn` for server errors.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let advisor = request
        .headers()
        .get(ADVISOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        tracing::warn!(%method, %path, %advisor, status, elapsed_ms, "Request failed");
    } else {
        tracing::info!(%method, %path, %advisor, status, elapsed_ms, "Request served");
    }
    response
}
