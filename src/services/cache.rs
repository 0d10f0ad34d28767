//! Result Cache: previously fetched result sets keyed by normalized query
//! text plus sort order.
//!
//! Owned by the panel store and threaded explicitly; no ambient state.
//! Unbounded, session-lifetime, never invalidated; entries are read-only
//! after insertion.

use std::collections::HashMap;

use crate::types::{DiscoveryItem, SortOrder};

#[derive(Debug, Default)]
pub struct SearchCache {
    entries: HashMap<String, Vec<DiscoveryItem>>,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key: trimmed + lower-cased query, sort order verbatim.
    pub fn key(query: &str, sort_order: SortOrder) -> String {
        format!("{}|{}", query.trim().to_lowercase(), sort_order.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Vec<DiscoveryItem>> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, items: Vec<DiscoveryItem>) {
        self.entries.insert(key, items);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
