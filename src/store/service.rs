//! Panel orchestration: the async layer that executes searches against
//! the Discovery Aggregator and mirrors durable state to storage.
//!
//! The store lock is never held across a provider fetch. There is no
//! request fencing: two racing searches on one panel both complete and
//! the later response wins.

use futures::future;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::persist::PanelRepository;
use super::{PanelStore, PanelStoreError, SearchPhase, SearchSpec};
use crate::services::discovery::{DiscoveryService, DEFAULT_SEARCH_LIMIT};
use crate::types::{Panel, SearchMode, SortOrder};

pub struct PanelService {
    store: RwLock<PanelStore>,
    discovery: Arc<DiscoveryService>,
    repository: PanelRepository,
}

impl PanelService {
    pub fn new(discovery: Arc<DiscoveryService>, repository: PanelRepository) -> Self {
        Self {
            store: RwLock::new(PanelStore::new()),
            discovery,
            repository,
        }
    }

    /// One-shot startup pass: load persisted panels, seed the store, and
    /// return the reconciliation set of searches to run.
    pub async fn hydrate(&self) -> Vec<SearchSpec> {
        let stored = self.repository.load().await;
        let restored = stored.len();
        let pending = self.store.write().await.hydrate(stored);
        tracing::info!(restored, pending = pending.len(), "Panels hydrated");
        pending
    }

    /// Run the post-hydration searches, concurrently across panels.
    pub async fn reconcile(&self, pending: Vec<SearchSpec>) {
        future::join_all(pending.into_iter().map(|spec| self.run_search(spec))).await;
    }

    /// Execute one search spec: optimistic mutation + cache lookup under
    /// the lock, then (on a miss) the provider fetch with the lock
    /// released, then outcome application.
    pub async fn run_search(&self, spec: SearchSpec) {
        let phase = self.store.write().await.begin_search(&spec);
        // The optimistic step touches durable fields (active term, mode).
        self.persist().await;

        if let SearchPhase::Fetch { query, cache_key } = phase {
            let outcome = self
                .discovery
                .search_by_query(&query, spec.sort_order, DEFAULT_SEARCH_LIMIT)
                .await;
            self.store
                .write()
                .await
                .complete_search(&spec.panel_id, &cache_key, outcome);
        }
    }

    pub async fn add_panel(
        &self,
        title: &str,
        labels_csv: &str,
    ) -> Result<Panel, PanelStoreError> {
        let (id, spec) = self.store.write().await.add_panel(title, labels_csv)?;
        tracing::info!(panel_id = %id, "Panel created");
        self.persist().await;
        if let Some(spec) = spec {
            self.run_search(spec).await;
        }
        self.snapshot(&id).await
    }

    pub async fn remove_panel(&self, id: &str) -> bool {
        let removed = self.store.write().await.remove_panel(id);
        if removed {
            tracing::info!(panel_id = %id, "Panel removed");
            self.persist().await;
        }
        removed
    }

    pub async fn add_search_term(&self, id: &str, raw: &str) -> Result<Panel, PanelStoreError> {
        let spec = self.store.write().await.add_search_term(id, raw)?;
        self.persist().await;
        self.run_search(spec).await;
        self.snapshot(id).await
    }

    pub async fn remove_search_term(&self, id: &str, term: &str) -> Result<Panel, PanelStoreError> {
        let spec = self.store.write().await.remove_search_term(id, term)?;
        self.persist().await;
        if let Some(spec) = spec {
            self.run_search(spec).await;
        }
        self.snapshot(id).await
    }

    pub async fn select_search_term(&self, id: &str, term: &str) -> Result<Panel, PanelStoreError> {
        let spec = self.store.write().await.select_search_term(id, term)?;
        self.persist().await;
        self.run_search(spec).await;
        self.snapshot(id).await
    }

    pub async fn set_sort_order(
        &self,
        id: &str,
        sort_order: SortOrder,
    ) -> Result<Panel, PanelStoreError> {
        let spec = self.store.write().await.set_sort_order(id, sort_order)?;
        self.persist().await;
        if let Some(spec) = spec {
            self.run_search(spec).await;
        }
        self.snapshot(id).await
    }

    pub async fn set_search_mode(
        &self,
        id: &str,
        search_mode: SearchMode,
    ) -> Result<Panel, PanelStoreError> {
        let spec = self.store.write().await.set_search_mode(id, search_mode)?;
        self.persist().await;
        if let Some(spec) = spec {
            self.run_search(spec).await;
        }
        self.snapshot(id).await
    }

    pub async fn reorder(&self, active_id: &str, over_id: Option<&str>) -> Vec<Panel> {
        let changed = self.store.write().await.reorder(active_id, over_id);
        if changed {
            self.persist().await;
        }
        self.panels().await
    }

    pub async fn panels(&self) -> Vec<Panel> {
        self.store.read().await.panels().to_vec()
    }

    pub async fn panel(&self, id: &str) -> Option<Panel> {
        self.store.read().await.panel(id).cloned()
    }

    pub async fn storage_ready(&self) -> bool {
        self.store.read().await.storage_ready()
    }

    async fn snapshot(&self, id: &str) -> Result<Panel, PanelStoreError> {
        self.panel(id)
            .await
            .ok_or_else(|| PanelStoreError::NotFound(id.to_string()))
    }

    /// Mirror durable fields to storage, gated on hydration having
    /// completed so an empty initial state never clobbers stored data.
    async fn persist(&self) {
        let stored = {
            let store = self.store.read().await;
            if !store.storage_ready() {
                return;
            }
            store.stored_panels()
        };
        if let Err(e) = self.repository.save(&stored).await {
            tracing::warn!(error = %e, "Failed to persist panels");
        }
    }
}
