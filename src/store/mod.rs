//! Panel Store: the central state machine over the user's panels.
//!
//! [`PanelStore`] is purely synchronous. Operations mutate panel state and
//! return a [`SearchSpec`] when the mutation requires a (re)search; the
//! async half lives in [`service::PanelService`], which executes specs
//! against the Discovery Aggregator and mirrors durable state to storage.
//!
//! A search runs in two phases: [`PanelStore::begin_search`] applies the
//! optimistic mutation and consults the Result Cache; on a miss the caller
//! performs the fetch and applies the outcome with
//! [`PanelStore::complete_search`].

pub mod ordering;
pub mod persist;
pub mod service;

use thiserror::Error;
use uuid::Uuid;

use crate::services::cache::SearchCache;
use crate::services::discovery::DiscoveryError;
use crate::types::{DiscoveryItem, Panel, SearchMode, SortOrder, StoredPanel};

pub const MSG_TITLE_REQUIRED: &str = "패널 이름을 입력해주세요.";
pub const MSG_DUPLICATE_TITLE: &str = "같은 이름의 패널이 이미 있습니다.";
pub const MSG_TERM_REQUIRED: &str = "추가할 검색어를 입력해주세요.";
pub const MSG_DUPLICATE_TERM: &str = "이미 등록된 검색어 라벨입니다.";
pub const MSG_UNKNOWN_TERM: &str = "등록되지 않은 검색어 라벨입니다.";
pub const MSG_SELECT_TERM: &str = "검색어 라벨을 선택해주세요.";
pub const MSG_YOUTUBE_KEY_REQUIRED: &str =
    "YouTube API 키가 필요합니다. YOUTUBE_API_KEY를 확인해주세요.";
pub const MSG_SEARCH_FAILED: &str = "검색 결과를 불러오지 못했습니다. 잠시 후 다시 시도해주세요.";

/// Failure of a store operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelStoreError {
    /// Locally recoverable input problem; the message is user-facing.
    #[error("{0}")]
    Validation(&'static str),

    #[error("panel not found: {0}")]
    NotFound(String),
}

/// Everything needed to run one search for one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpec {
    pub panel_id: String,
    pub title: String,
    pub term: String,
    pub sort_order: SortOrder,
    pub search_mode: SearchMode,
}

/// Outcome of the synchronous first phase of a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    /// Served from the Result Cache; the panel is already up to date.
    CacheHit,
    /// Cache miss: the caller must fetch `query` and report back via
    /// [`PanelStore::complete_search`] with `cache_key`.
    Fetch { query: String, cache_key: String },
    /// Nothing to fetch (blank label or the panel is gone).
    Rejected,
}

/// Resolve the effective provider query for a panel search.
pub fn resolve_search_query(title: &str, term: &str, mode: SearchMode) -> String {
    let term = term.trim();
    if term.is_empty() {
        return String::new();
    }
    if mode == SearchMode::LabelOnly {
        return term.to_string();
    }
    let title = title.trim();
    if title.is_empty() {
        term.to_string()
    } else {
        format!("{title} {term}")
    }
}

/// Trim, drop blanks, and deduplicate case-insensitively keeping the first
/// occurrence's casing.
pub(crate) fn dedupe_terms<I>(raw: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for term in raw {
        let term = term.as_ref().trim();
        if term.is_empty() {
            continue;
        }
        let folded = term.to_lowercase();
        if seen.contains(&folded) {
            continue;
        }
        seen.push(folded);
        out.push(term.to_string());
    }
    out
}

/// The ordered panel collection plus the session Result Cache.
#[derive(Debug, Default)]
pub struct PanelStore {
    panels: Vec<Panel>,
    cache: SearchCache,
    storage_ready: bool,
}

impl PanelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    /// True once initial hydration has completed; persistence is gated on
    /// this so an empty initial state never overwrites stored data.
    pub fn storage_ready(&self) -> bool {
        self.storage_ready
    }

    /// Durable projection of every panel, in display order.
    pub fn stored_panels(&self) -> Vec<StoredPanel> {
        self.panels.iter().map(Panel::to_stored).collect()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Seed the store from persisted panels and mark it ready. Returns the
    /// reconciliation set: one spec per panel whose active term is
    /// non-blank and has not been searched this session.
    pub fn hydrate(&mut self, stored: Vec<StoredPanel>) -> Vec<SearchSpec> {
        self.panels = stored.into_iter().map(Panel::from_stored).collect();
        self.storage_ready = true;

        self.panels
            .iter()
            .filter(|panel| !panel.active_term.trim().is_empty() && !panel.searched)
            .map(spec_for)
            .collect()
    }

    /// Create a panel from a title and a comma-separated label list.
    pub fn add_panel(
        &mut self,
        title: &str,
        labels_csv: &str,
    ) -> Result<(String, Option<SearchSpec>), PanelStoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PanelStoreError::Validation(MSG_TITLE_REQUIRED));
        }

        let folded = title.to_lowercase();
        if self
            .panels
            .iter()
            .any(|p| p.title.trim().to_lowercase() == folded)
        {
            return Err(PanelStoreError::Validation(MSG_DUPLICATE_TITLE));
        }

        let search_terms = dedupe_terms(labels_csv.split(','));
        let active_term = search_terms.first().cloned().unwrap_or_default();
        let id = Uuid::new_v4().to_string();

        self.panels.push(Panel::from_stored(StoredPanel {
            id: id.clone(),
            title: title.to_string(),
            search_terms,
            active_term: active_term.clone(),
            sort_order: SortOrder::default(),
            search_mode: SearchMode::default(),
        }));

        let spec = (!active_term.is_empty()).then(|| SearchSpec {
            panel_id: id.clone(),
            title: title.to_string(),
            term: active_term,
            sort_order: SortOrder::default(),
            search_mode: SearchMode::default(),
        });

        Ok((id, spec))
    }

    /// Drop a panel. Returns false when the id was unknown.
    pub fn remove_panel(&mut self, id: &str) -> bool {
        let before = self.panels.len();
        self.panels.retain(|p| p.id != id);
        self.panels.len() != before
    }

    /// Append a label and make it active. Validation failures set the
    /// panel's inline error and are reported back to the caller.
    pub fn add_search_term(
        &mut self,
        panel_id: &str,
        raw: &str,
    ) -> Result<SearchSpec, PanelStoreError> {
        let panel = panel_mut(&mut self.panels, panel_id)
            .ok_or_else(|| PanelStoreError::NotFound(panel_id.to_string()))?;

        let term = raw.trim();
        if term.is_empty() {
            panel.error = Some(MSG_TERM_REQUIRED.to_string());
            return Err(PanelStoreError::Validation(MSG_TERM_REQUIRED));
        }

        let folded = term.to_lowercase();
        if panel
            .search_terms
            .iter()
            .any(|t| t.trim().to_lowercase() == folded)
        {
            panel.error = Some(MSG_DUPLICATE_TERM.to_string());
            return Err(PanelStoreError::Validation(MSG_DUPLICATE_TERM));
        }

        panel.search_terms.push(term.to_string());
        panel.active_term = term.to_string();
        panel.error = None;
        Ok(spec_for(panel))
    }

    /// Remove a label. If it was active, activation moves to the first
    /// remaining label (returning the spec for the follow-up search) or
    /// clears the panel's results entirely. Removing a non-active label
    /// never triggers a search.
    pub fn remove_search_term(
        &mut self,
        panel_id: &str,
        term: &str,
    ) -> Result<Option<SearchSpec>, PanelStoreError> {
        let panel = panel_mut(&mut self.panels, panel_id)
            .ok_or_else(|| PanelStoreError::NotFound(panel_id.to_string()))?;

        let was_active = panel.active_term == term;
        panel.search_terms.retain(|t| t != term);
        panel.error = None;

        if !was_active {
            return Ok(None);
        }

        panel.active_term = panel.search_terms.first().cloned().unwrap_or_default();
        if panel.active_term.is_empty() {
            panel.items.clear();
            panel.searched = false;
            Ok(None)
        } else {
            Ok(Some(spec_for(panel)))
        }
    }

    /// Make an existing label the active one.
    pub fn select_search_term(
        &mut self,
        panel_id: &str,
        term: &str,
    ) -> Result<SearchSpec, PanelStoreError> {
        let panel = panel_mut(&mut self.panels, panel_id)
            .ok_or_else(|| PanelStoreError::NotFound(panel_id.to_string()))?;

        // The active term is always a member of the label set or empty.
        if !panel.search_terms.iter().any(|t| t == term) {
            panel.error = Some(MSG_UNKNOWN_TERM.to_string());
            return Err(PanelStoreError::Validation(MSG_UNKNOWN_TERM));
        }

        panel.active_term = term.to_string();
        panel.error = None;
        Ok(spec_for(panel))
    }

    /// Change the sort order; re-search when a label is active.
    pub fn set_sort_order(
        &mut self,
        panel_id: &str,
        sort_order: SortOrder,
    ) -> Result<Option<SearchSpec>, PanelStoreError> {
        let panel = panel_mut(&mut self.panels, panel_id)
            .ok_or_else(|| PanelStoreError::NotFound(panel_id.to_string()))?;

        panel.sort_order = sort_order;
        panel.error = None;
        Ok(active_spec(panel))
    }

    /// Change the search mode; re-search when a label is active.
    pub fn set_search_mode(
        &mut self,
        panel_id: &str,
        search_mode: SearchMode,
    ) -> Result<Option<SearchSpec>, PanelStoreError> {
        let panel = panel_mut(&mut self.panels, panel_id)
            .ok_or_else(|| PanelStoreError::NotFound(panel_id.to_string()))?;

        panel.search_mode = search_mode;
        panel.error = None;
        Ok(active_spec(panel))
    }

    /// Apply a drag-completion reorder. Returns true when the order changed.
    pub fn reorder(&mut self, active_id: &str, over_id: Option<&str>) -> bool {
        ordering::reorder(&mut self.panels, active_id, over_id)
    }

    /// Phase one of a search: optimistic panel mutation plus cache lookup.
    pub fn begin_search(&mut self, spec: &SearchSpec) -> SearchPhase {
        let term = spec.term.trim().to_string();
        let query = resolve_search_query(&spec.title, &term, spec.search_mode);
        let cache_key = SearchCache::key(&query, spec.sort_order);

        {
            let Some(panel) = panel_mut(&mut self.panels, &spec.panel_id) else {
                return SearchPhase::Rejected;
            };
            panel.active_term = term.clone();
            panel.search_mode = spec.search_mode;
            panel.searched = true;
            panel.error = None;
            panel.loading = !query.is_empty();

            if term.is_empty() {
                panel.items.clear();
                panel.error = Some(MSG_SELECT_TERM.to_string());
                return SearchPhase::Rejected;
            }
        }

        if let Some(items) = self.cache.get(&cache_key).cloned() {
            if let Some(panel) = panel_mut(&mut self.panels, &spec.panel_id) {
                panel.items = items;
                panel.loading = false;
                panel.error = None;
            }
            return SearchPhase::CacheHit;
        }

        SearchPhase::Fetch { query, cache_key }
    }

    /// Phase two of a search: apply the fetch outcome. Successful results
    /// are cached even if the requesting panel has since been removed.
    /// No request fencing: when two searches race on one panel, whichever
    /// outcome lands last wins.
    pub fn complete_search(
        &mut self,
        panel_id: &str,
        cache_key: &str,
        outcome: Result<Vec<DiscoveryItem>, DiscoveryError>,
    ) {
        match outcome {
            Ok(items) => {
                self.cache.insert(cache_key.to_string(), items.clone());
                if let Some(panel) = panel_mut(&mut self.panels, panel_id) {
                    panel.items = items;
                    panel.loading = false;
                    panel.error = None;
                }
            }
            Err(error) => {
                let message = match &error {
                    DiscoveryError::Config { .. } => MSG_YOUTUBE_KEY_REQUIRED,
                    DiscoveryError::Provider(_) => MSG_SEARCH_FAILED,
                };
                tracing::warn!(panel_id, error = %error, "Panel search failed");
                if let Some(panel) = panel_mut(&mut self.panels, panel_id) {
                    panel.items.clear();
                    panel.loading = false;
                    panel.error = Some(message.to_string());
                }
            }
        }
    }
}

fn panel_mut<'a>(panels: &'a mut [Panel], id: &str) -> Option<&'a mut Panel> {
    panels.iter_mut().find(|p| p.id == id)
}

fn spec_for(panel: &Panel) -> SearchSpec {
    SearchSpec {
        panel_id: panel.id.clone(),
        title: panel.title.clone(),
        term: panel.active_term.clone(),
        sort_order: panel.sort_order,
        search_mode: panel.search_mode,
    }
}

fn active_spec(panel: &Panel) -> Option<SearchSpec> {
    if panel.active_term.trim().is_empty() {
        None
    } else {
        Some(spec_for(panel))
    }
}
