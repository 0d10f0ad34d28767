//! hobbydeck library interface
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod categories;
pub mod config;
pub mod error;
pub mod services;
pub mod store;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::services::discovery::DiscoveryService;
use crate::store::service::PanelService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Panel store plus its search orchestration
    pub panels: Arc<PanelService>,
    /// Two-provider discovery aggregator
    pub discovery: Arc<DiscoveryService>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(panels: Arc<PanelService>, discovery: Arc<DiscoveryService>) -> Self {
        Self {
            panels,
            discovery,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::panel_routes())
        .merge(api::discovery_routes())
        .merge(api::health_routes())
        .with_state(state)
}
