//! Search sources that return tweets one page at a time.
//!
//! A [`SearchSource`] knows how to turn a [`SearchQuery`] and an optional
//! continuation token into a single [`PageResponse`]. Paging, filtering and
//! projection live in [`crate::fetch`]; sources only talk to the upstream.
//!
//! - [`TwitterSource`]: the recent search endpoint of the Twitter API v2
//! - [`MockSource`]: scripted pages for tests

pub mod mock;
mod twitter;

pub use mock::MockSource;
pub use twitter::{TwitterSource, TWITTER_API_BASE};

use crate::models::{PageResponse, SearchQuery};
use async_trait::async_trait;

/// Everything a source needs to fetch one page
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub query: &'a SearchQuery,

    /// Caller-supplied credential, passed through unchanged
    pub bearer_token: &'a str,

    /// Continuation token from the previous page, `None` for the first page
    pub next_token: Option<&'a str>,
}

impl<'a> PageRequest<'a> {
    /// Request for the first page
    pub fn first(query: &'a SearchQuery, bearer_token: &'a str) -> Self {
        Self {
            query,
            bearer_token,
            next_token: None,
        }
    }

    /// Request for the page after `next_token`
    pub fn after(query: &'a SearchQuery, bearer_token: &'a str, next_token: &'a str) -> Self {
        Self {
            query,
            bearer_token,
            next_token: Some(next_token),
        }
    }
}

/// A remote source of paged search results.
#[async_trait]
pub trait SearchSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Fetch a single page. Implementations must not retry.
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<PageResponse, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    /// The upstream answered with a non-success status
    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SourceError {
    /// HTTP status code, if the upstream answered
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message_keeps_body() {
        let err = SourceError::Status {
            status: 429,
            body: r#"{"title":"Too Many Requests"}"#.to_string(),
        };
        assert_eq!(err.status(), Some(429));
        assert_eq!(
            err.to_string(),
            r#"upstream returned status 429: {"title":"Too Many Requests"}"#
        );
        assert_eq!(SourceError::Network("reset".into()).status(), None);
    }

    #[test]
    fn test_page_request_constructors() {
        let query = SearchQuery::new("rust");
        assert!(PageRequest::first(&query, "t").next_token.is_none());
        let request = PageRequest::after(&query, "t", "abc");
        assert_eq!(request.next_token, Some("abc"));
        assert_eq!(request.bearer_token, "t");
    }
}
