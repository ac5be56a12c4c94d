//! Search handler.

use axum::Json;
use axum::extract::{Path, Query, State};

use crate::dto::request::SearchQuery;
use crate::dto::response::{ApiResponse, FileResponse, SearchResponse};
use crate::error::ApiError;
use crate::extractors::parse_case_id;
use crate::state::AppState;

/// GET /api/cases/{case_id}/search?q=...
pub async fn search(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResponse>>, ApiError> {
    let case_id = parse_case_id(&case_id)?;
    let results = state.filestore.search.search(case_id, &query.q).await?;

    let items: Vec<FileResponse> = results.iter().cloned().map(FileResponse::from).collect();
    Ok(Json(ApiResponse::ok(SearchResponse {
        query: query.q,
        total: items.len(),
        items,
    })))
}
