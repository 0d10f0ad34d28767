//! Category fan-out endpoint.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::services::discovery::{DiscoveryOverview, DEFAULT_FANOUT_LIMIT};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DiscoveryQuery {
    pub limit: Option<u8>,
}

/// GET /api/discovery?limit=N
pub async fn discovery_overview(
    State(state): State<AppState>,
    Query(query): Query<DiscoveryQuery>,
) -> ApiResult<Json<DiscoveryOverview>> {
    let limit = query.limit.unwrap_or(DEFAULT_FANOUT_LIMIT);
    let overview = state.discovery.fetch_by_categories(limit).await?;
    Ok(Json(overview))
}

/// Build discovery routes
pub fn discovery_routes() -> Router<AppState> {
    Router::new().route("/api/discovery", get(discovery_overview))
}
