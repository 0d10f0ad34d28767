//! hobbydeck - Hobby Panel Service
//!
//! Manages user-defined hobby panels whose search results come from two
//! content providers (Google Custom Search + YouTube), with local
//! persistence and a REST API on port 5870.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use hobbydeck::config::Config;
use hobbydeck::services::discovery::DiscoveryService;
use hobbydeck::store::persist::PanelRepository;
use hobbydeck::store::service::PanelService;
use hobbydeck::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting hobbydeck (Hobby Panel Service)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load();
    info!("Database: {}", config.database_path.display());

    let repository = PanelRepository::open(&config.database_path).await;
    let discovery = Arc::new(DiscoveryService::from_config(&config.discovery));
    let panels = Arc::new(PanelService::new(discovery.clone(), repository));

    // Restore persisted panels, then replay one search per panel with an
    // active label in the background.
    let pending = panels.hydrate().await;
    if !pending.is_empty() {
        let panels = panels.clone();
        tokio::spawn(async move {
            panels.reconcile(pending).await;
        });
    }

    let state = AppState::new(panels, discovery);
    let app = hobbydeck::build_router(state);

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");
    info!("Health check: http://{addr}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
