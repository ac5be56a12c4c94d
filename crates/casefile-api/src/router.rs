//! Route definitions for the filestore HTTP API.
//!
//! Case-scoped routes live under `/api/cases/{case_id}`; maintenance and
//! health routes sit directly under `/api`.

use std::time::Duration;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::timeout::TimeoutLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the API router. Layers shared by every route are added in
/// [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    // Uploads are bounded by the upload timeout instead of the request timeout.
    let api_routes = Router::new()
        .nest(
            "/cases/{case_id}",
            case_routes()
                .layer(TimeoutLayer::new(timeout))
                .merge(upload_routes()),
        )
        .merge(maintenance_routes().layer(TimeoutLayer::new(timeout)));

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Folder, file, search, and stats endpoints of one case
fn case_routes() -> Router<AppState> {
    Router::new()
        .route("/initialize", post(handlers::case::initialize_case))
        .route("/tree", get(handlers::case::get_tree))
        .route("/breadcrumbs", get(handlers::case::breadcrumbs))
        .route("/stats", get(handlers::case::get_stats))
        .route(
            "/folders",
            get(handlers::folder::list_children)
                .post(handlers::folder::create_folder)
                .delete(handlers::folder::delete_folder),
        )
        .route("/folders/resolve", get(handlers::folder::resolve_path))
        .route("/files", get(handlers::file::list_files))
        .route("/files/{file_id}", get(handlers::file::get_file))
        .route("/files/{file_id}/content", get(handlers::file::download_file))
        .route("/files/{file_id}/tags", put(handlers::file::set_tags))
        .route("/files/{file_id}/category", put(handlers::file::set_category))
        .route("/search", get(handlers::search::search))
}

/// Streamed upload endpoint
fn upload_routes() -> Router<AppState> {
    Router::new().route("/files", post(handlers::file::upload_file))
}

/// Sweep and health endpoints
fn maintenance_routes() -> Router<AppState> {
    Router::new()
        .route("/maintenance/sweep", post(handlers::maintenance::sweep))
        .route("/health", get(handlers::health::health))
}
