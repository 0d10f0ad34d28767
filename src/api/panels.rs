//! REST handlers for the panel store operations.
//!
//! Mutating handlers run the triggered search to completion before
//! responding, so the returned panel reflects the search outcome
//! (results, or an inline error message).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::types::{Panel, SearchMode, SortOrder};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelsResponse {
    pub storage_ready: bool,
    pub panels: Vec<Panel>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePanelRequest {
    pub title: String,
    /// Comma-separated initial labels, may be empty.
    #[serde(default)]
    pub labels: String,
}

#[derive(Debug, Deserialize)]
pub struct TermRequest {
    pub term: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOrderRequest {
    pub sort_order: SortOrder,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchModeRequest {
    pub search_mode: SearchMode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub active_id: String,
    #[serde(default)]
    pub over_id: Option<String>,
}

/// GET /api/panels
pub async fn list_panels(State(state): State<AppState>) -> Json<PanelsResponse> {
    Json(PanelsResponse {
        storage_ready: state.panels.storage_ready().await,
        panels: state.panels.panels().await,
    })
}

/// POST /api/panels
pub async fn create_panel(
    State(state): State<AppState>,
    Json(req): Json<CreatePanelRequest>,
) -> ApiResult<(StatusCode, Json<Panel>)> {
    let panel = state.panels.add_panel(&req.title, &req.labels).await?;
    Ok((StatusCode::CREATED, Json(panel)))
}

/// DELETE /api/panels/:id
pub async fn delete_panel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.panels.remove_panel(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(crate::ApiError::NotFound(format!("panel {id}")))
    }
}

/// POST /api/panels/:id/terms
pub async fn add_term(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TermRequest>,
) -> ApiResult<Json<Panel>> {
    let panel = state.panels.add_search_term(&id, &req.term).await?;
    Ok(Json(panel))
}

/// DELETE /api/panels/:id/terms
pub async fn remove_term(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TermRequest>,
) -> ApiResult<Json<Panel>> {
    let panel = state.panels.remove_search_term(&id, &req.term).await?;
    Ok(Json(panel))
}

/// PUT /api/panels/:id/active-term
pub async fn select_term(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TermRequest>,
) -> ApiResult<Json<Panel>> {
    let panel = state.panels.select_search_term(&id, &req.term).await?;
    Ok(Json(panel))
}

/// PUT /api/panels/:id/sort-order
pub async fn set_sort_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SortOrderRequest>,
) -> ApiResult<Json<Panel>> {
    let panel = state.panels.set_sort_order(&id, req.sort_order).await?;
    Ok(Json(panel))
}

/// PUT /api/panels/:id/search-mode
pub async fn set_search_mode(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SearchModeRequest>,
) -> ApiResult<Json<Panel>> {
    let panel = state.panels.set_search_mode(&id, req.search_mode).await?;
    Ok(Json(panel))
}

/// POST /api/panels/reorder
pub async fn reorder_panels(
    State(state): State<AppState>,
    Json(req): Json<ReorderRequest>,
) -> Json<Vec<Panel>> {
    let panels = state
        .panels
        .reorder(&req.active_id, req.over_id.as_deref())
        .await;
    Json(panels)
}

/// Build panel routes
pub fn panel_routes() -> Router<AppState> {
    Router::new()
        .route("/api/panels", get(list_panels).post(create_panel))
        .route("/api/panels/reorder", post(reorder_panels))
        .route("/api/panels/:id", delete(delete_panel))
        .route("/api/panels/:id/terms", post(add_term).delete(remove_term))
        .route("/api/panels/:id/active-term", put(select_term))
        .route("/api/panels/:id/sort-order", put(set_sort_order))
        .route("/api/panels/:id/search-mode", put(set_search_mode))
}
