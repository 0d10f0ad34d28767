//! YouTube Data API search client.
//!
//! The mandatory provider: every panel search and every category fan-out
//! goes through it. Fan-out requests leave `order` unset (provider default
//! relevance); the single-query path passes the panel's sort order.

use serde::Deserialize;
use std::time::Duration;

use super::ProviderError;
use crate::types::SortOrder;

const YOUTUBE_SEARCH_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const USER_AGENT: &str = concat!("hobbydeck/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Raw YouTube search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YoutubeSearchResponse {
    #[serde(default)]
    pub items: Vec<YoutubeSearchItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YoutubeSearchItem {
    pub id: Option<YoutubeVideoId>,
    pub snippet: Option<YoutubeSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YoutubeVideoId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeSnippet {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
    pub thumbnails: Option<YoutubeThumbnails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YoutubeThumbnails {
    pub default: Option<YoutubeThumbnail>,
    pub medium: Option<YoutubeThumbnail>,
    pub high: Option<YoutubeThumbnail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YoutubeThumbnail {
    pub url: Option<String>,
}

/// YouTube Data API v3 search client.
pub struct YoutubeSearchClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YoutubeSearchClient {
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, YOUTUBE_SEARCH_BASE_URL.to_string())
    }

    /// Point the client at an alternate endpoint (test servers).
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    /// One video search, single attempt, no retry.
    pub async fn search(
        &self,
        query: &str,
        limit: u8,
        order: Option<SortOrder>,
    ) -> Result<YoutubeSearchResponse, ProviderError> {
        tracing::debug!(query, limit, order = order.map(|o| o.as_str()), "YouTube search request");

        let mut request = self.http.get(&self.base_url).query(&[
            ("key", self.api_key.as_str()),
            ("part", "snippet"),
            ("type", "video"),
            ("maxResults", &limit.to_string()),
        ]);
        if let Some(order) = order {
            request = request.query(&[("order", order.as_str())]);
        }
        let response = request.query(&[("q", query)]).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
