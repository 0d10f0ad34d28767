//! Discovery Aggregator: merges both providers for category fan-out and
//! drives the single-query search path used by panels.
//!
//! Provider A (Google) is optional — its failures degrade to warnings.
//! Provider B (YouTube) is mandatory — a missing credential is a
//! configuration error and a request failure fails the call.

use futures::future;
use serde::Serialize;
use thiserror::Error;

use super::google::GoogleSearchClient;
use super::normalize::{
    normalize_google_items, normalize_youtube_items, normalize_youtube_query_items,
};
use super::youtube::YoutubeSearchClient;
use super::ProviderError;
use crate::categories::{HobbyCategory, HOBBY_CATEGORIES};
use crate::config::DiscoveryConfig;
use crate::types::{DiscoveryItem, SortOrder};

/// Warning when provider A fails mid-call.
pub const GOOGLE_FAILED_WARNING: &str = "Google 검색 연동에 실패해 YouTube 결과만 표시합니다.";
/// Warning when provider A credentials are not configured.
pub const GOOGLE_NOT_CONFIGURED_WARNING: &str =
    "Google API 키 또는 CSE ID가 없어 YouTube 결과만 표시합니다. (GOOGLE_API_KEY / GOOGLE_CSE_ID 설정 필요)";

/// Credential name reported when provider B is unconfigured.
pub const YOUTUBE_API_KEY_NAME: &str = "YOUTUBE_API_KEY";

const MIN_RESULT_LIMIT: u8 = 1;
const MAX_RESULT_LIMIT: u8 = 5;
/// Default per-source limit for category fan-out.
pub const DEFAULT_FANOUT_LIMIT: u8 = 3;
/// Default limit for panel searches.
pub const DEFAULT_SEARCH_LIMIT: u8 = 5;

/// Discovery failure, tagged so callers branch on data rather than on
/// exception identity.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Required credentials are absent; `missing` names them.
    #[error("missing discovery API keys: {}", missing.join(", "))]
    Config { missing: Vec<String> },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// One category with its merged items (provider-A items first).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDiscovery {
    pub key: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub tags: &'static [&'static str],
    pub query: &'static str,
    pub items: Vec<DiscoveryItem>,
}

/// Full fan-out result with call-wide deduplicated warnings.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryOverview {
    pub categories: Vec<CategoryDiscovery>,
    pub warnings: Vec<String>,
}

/// Aggregates the two provider clients behind the discovery contracts.
pub struct DiscoveryService {
    google: Option<GoogleSearchClient>,
    youtube: Option<YoutubeSearchClient>,
}

impl DiscoveryService {
    /// Assemble clients from configured credentials. Either provider may
    /// end up absent; the call sites decide how that degrades.
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        let google = if config.google_configured() {
            match GoogleSearchClient::new(
                config.google_api_key.clone().unwrap_or_default(),
                config.google_cse_id.clone().unwrap_or_default(),
            ) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!(error = %e, "Google client unavailable, continuing YouTube-only");
                    None
                }
            }
        } else {
            None
        };

        let youtube = match config.youtube_api_key.clone() {
            Some(key) => match YoutubeSearchClient::new(key) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!(error = %e, "YouTube client could not be created");
                    None
                }
            },
            None => None,
        };

        Self { google, youtube }
    }

    /// Build from explicit clients (tests point these at a fake server).
    pub fn new(google: Option<GoogleSearchClient>, youtube: Option<YoutubeSearchClient>) -> Self {
        Self { google, youtube }
    }

    fn youtube(&self) -> Result<&YoutubeSearchClient, DiscoveryError> {
        self.youtube.as_ref().ok_or_else(|| DiscoveryError::Config {
            missing: vec![YOUTUBE_API_KEY_NAME.to_string()],
        })
    }

    /// Category fan-out: every fixed category against both providers,
    /// concurrently across categories.
    pub async fn fetch_by_categories(
        &self,
        limit_per_source: u8,
    ) -> Result<DiscoveryOverview, DiscoveryError> {
        self.youtube()?;
        let limit = clamp_limit(limit_per_source);

        let mut warnings: Vec<String> = Vec::new();
        if self.google.is_none() {
            warnings.push(GOOGLE_NOT_CONFIGURED_WARNING.to_string());
        }

        let fetches = HOBBY_CATEGORIES
            .iter()
            .map(|category| self.fetch_category(category, limit));
        let results = future::join_all(fetches).await;

        let mut categories = Vec::with_capacity(HOBBY_CATEGORIES.len());
        for result in results {
            let (category, warning) = result?;
            if let Some(warning) = warning {
                if !warnings.iter().any(|w| w == warning) {
                    warnings.push(warning.to_string());
                }
            }
            categories.push(category);
        }

        tracing::info!(
            categories = categories.len(),
            warnings = warnings.len(),
            "Category fan-out complete"
        );

        Ok(DiscoveryOverview {
            categories,
            warnings,
        })
    }

    async fn fetch_category(
        &self,
        category: &'static HobbyCategory,
        limit: u8,
    ) -> Result<(CategoryDiscovery, Option<&'static str>), DiscoveryError> {
        let mut warning = None;
        let mut items = Vec::new();

        if let Some(google) = &self.google {
            match google.search(category.query, limit).await {
                Ok(payload) => items = normalize_google_items(category.key, &payload),
                Err(e) => {
                    tracing::warn!(category = category.key, error = %e, "Google fetch failed");
                    warning = Some(GOOGLE_FAILED_WARNING);
                }
            }
        }

        // YouTube failure fails the whole category fetch.
        let payload = self
            .youtube()?
            .search(category.query, limit, None)
            .await
            .map_err(DiscoveryError::Provider)?;
        items.extend(normalize_youtube_items(category.key, &payload));

        Ok((
            CategoryDiscovery {
                key: category.key,
                title: category.title,
                summary: category.summary,
                tags: category.tags,
                query: category.query,
                items,
            },
            warning,
        ))
    }

    /// Single-query search: provider B only. A blank query short-circuits
    /// to an empty result without touching the network.
    pub async fn search_by_query(
        &self,
        query: &str,
        order: SortOrder,
        limit: u8,
    ) -> Result<Vec<DiscoveryItem>, DiscoveryError> {
        let youtube = self.youtube()?;

        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let limit = clamp_limit(limit);
        let payload = youtube.search(query, limit, Some(order)).await?;
        Ok(normalize_youtube_query_items(query, &payload))
    }
}

fn clamp_limit(limit: u8) -> u8 {
    limit.clamp(MIN_RESULT_LIMIT, MAX_RESULT_LIMIT)
}
