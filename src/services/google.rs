//! Google Custom Search client.
//!
//! Optional provider: the service runs YouTube-only when its credentials
//! are absent. Payload structs accept partial items; unknown fields are
//! ignored by serde, missing collections default to empty.

use serde::Deserialize;
use std::time::Duration;

use super::ProviderError;

const GOOGLE_SEARCH_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";
const USER_AGENT: &str = concat!("hobbydeck/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Raw Google Custom Search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleSearchResponse {
    #[serde(default)]
    pub items: Vec<GoogleSearchItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleSearchItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
    pub pagemap: Option<GooglePageMap>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GooglePageMap {
    #[serde(default)]
    pub cse_image: Vec<GoogleCseImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleCseImage {
    pub src: Option<String>,
}

/// Google Custom Search API client.
pub struct GoogleSearchClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    cse_id: String,
}

impl GoogleSearchClient {
    pub fn new(api_key: String, cse_id: String) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, cse_id, GOOGLE_SEARCH_BASE_URL.to_string())
    }

    /// Point the client at an alternate endpoint (test servers).
    pub fn with_base_url(
        api_key: String,
        cse_id: String,
        base_url: String,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key,
            cse_id,
        })
    }

    /// One search request, single attempt, no retry.
    pub async fn search(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<GoogleSearchResponse, ProviderError> {
        tracing::debug!(query, limit, "Google search request");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cse_id.as_str()),
                ("num", &limit.to_string()),
                ("q", query),
            ])
            .send()
            .await?;

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
