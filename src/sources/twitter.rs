//! Twitter API v2 recent search source.

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{format_timestamp, wire_field_list, PageResponse, Tweet};
use crate::sources::{PageRequest, SearchSource, SourceError};
use crate::utils::HttpClient;

/// Production API host
pub const TWITTER_API_BASE: &str = "https://api.twitter.com";

const RECENT_SEARCH_PATH: &str = "/2/tweets/search/recent";

/// Recent search over the Twitter API v2.
///
/// The bearer token travels with each [`PageRequest`].
#[derive(Debug, Clone)]
pub struct TwitterSource {
    client: HttpClient,
    endpoint: url::Url,
}

impl TwitterSource {
    /// Create a source against the production API
    pub fn new(client: HttpClient) -> Result<Self, SourceError> {
        Self::with_base_url(client, TWITTER_API_BASE)
    }

    /// Create a source against a different host (proxies, test servers)
    pub fn with_base_url(client: HttpClient, base_url: &str) -> Result<Self, SourceError> {
        let endpoint = url::Url::parse(base_url)
            .and_then(|base| base.join(RECENT_SEARCH_PATH))
            .map_err(|e| {
                SourceError::InvalidRequest(format!("invalid base URL {}: {}", base_url, e))
            })?;

        Ok(Self { client, endpoint })
    }

    /// Full URL of the recent search endpoint
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    fn query_params(request: &PageRequest<'_>) -> Vec<(&'static str, String)> {
        let query = request.query;
        let mut params = vec![
            ("query", query.keyword.clone()),
            ("max_results", query.page_size().to_string()),
            ("tweet.fields", wire_field_list(&query.fields)),
        ];
        if let Some(window) = &query.window {
            params.push(("start_time", format_timestamp(&window.start())));
            params.push(("end_time", format_timestamp(&window.end())));
        }
        if let Some(token) = request.next_token {
            params.push(("next_token", token.to_string()));
        }
        params
    }
}

#[async_trait]
impl SearchSource for TwitterSource {
    fn id(&self) -> &str {
        "twitter"
    }

    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<PageResponse, SourceError> {
        let response = self
            .client
            .client()
            .get(self.endpoint.clone())
            .query(&Self::query_params(request))
            .bearer_auth(request.bearer_token)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to search recent tweets: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: RecentSearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        Ok(PageResponse::new(
            data.data,
            data.meta.and_then(|meta| meta.next_token),
        ))
    }
}

// ===== Twitter API Types =====

#[derive(Debug, Deserialize)]
struct RecentSearchResponse {
    /// Absent when nothing matched
    #[serde(default)]
    data: Vec<Tweet>,
    #[serde(default)]
    meta: Option<SearchMeta>,
}

#[derive(Debug, Deserialize)]
struct SearchMeta {
    next_token: Option<String>,
}
