//! Core types shared across all layers: panels, discovery items, and the
//! enums that parameterize a search.
//!
//! Serde renames keep the wire/persisted shapes camelCase, matching the
//! JSON documents stored under the panel storage key.

use serde::{Deserialize, Serialize};

/// Result ordering requested from the video search provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Relevance,
    Date,
    ViewCount,
}

impl SortOrder {
    /// Wire value, used verbatim in cache keys and as the provider's
    /// `order` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::Date => "date",
            SortOrder::ViewCount => "viewCount",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the panel title is prefixed onto the active label when forming
/// the provider query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
    LabelOnly,
    #[default]
    CategoryPlusLabel,
}

/// Which provider produced a discovery item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentSource {
    Google,
    Youtube,
}

impl std::fmt::Display for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentSource::Google => write!(f, "google"),
            ContentSource::Youtube => write!(f, "youtube"),
        }
    }
}

/// A normalized, provider-agnostic search result.
///
/// `id` is synthetic and stable for a given (source, context, position)
/// combination within one batch; it is a rendering/dedup key, not a global
/// content identifier. Which optional fields are populated depends on
/// `source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: ContentSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Durable subset of a panel, exactly the shape persisted to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPanel {
    pub id: String,
    pub title: String,
    pub search_terms: Vec<String>,
    pub active_term: String,
    pub sort_order: SortOrder,
    pub search_mode: SearchMode,
}

/// A user-defined panel: durable fields plus the transient fetch state
/// that is re-derived every session and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: String,
    pub title: String,
    pub search_terms: Vec<String>,
    pub active_term: String,
    pub sort_order: SortOrder,
    pub search_mode: SearchMode,
    pub items: Vec<DiscoveryItem>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub searched: bool,
}

impl Panel {
    /// Seed a panel from its persisted shape with empty transient state.
    pub fn from_stored(stored: StoredPanel) -> Self {
        Self {
            id: stored.id,
            title: stored.title,
            search_terms: stored.search_terms,
            active_term: stored.active_term,
            sort_order: stored.sort_order,
            search_mode: stored.search_mode,
            items: Vec::new(),
            loading: false,
            error: None,
            searched: false,
        }
    }

    /// Project the durable subset for persistence.
    pub fn to_stored(&self) -> StoredPanel {
        StoredPanel {
            id: self.id.clone(),
            title: self.title.clone(),
            search_terms: self.search_terms.clone(),
            active_term: self.active_term.clone(),
            sort_order: self.sort_order,
            search_mode: self.search_mode,
        }
    }
}
