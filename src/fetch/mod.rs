//! Paginated, filtered fetching of recent tweets.
//!
//! The [`Paginator`] walks continuation tokens of a [`SearchSource`] one page
//! at a time. Each page is filtered as it arrives and the survivors are
//! appended to the result set. Paging stops at the first of:
//!
//! - a page without a continuation token
//! - the result set reaching the query's target count
//! - the query's page ceiling
//!
//! The result is not trimmed, so it may exceed the target by up to one page.
//! Upstream errors abort the whole fetch and nothing collected so far is
//! returned.

mod filter;
mod projection;

pub use filter::TweetFilter;
pub use projection::Projection;

use std::sync::Arc;
use std::time::Duration;

use crate::models::{QueryError, ResultSet, SearchQuery, TerminationReason};
use crate::sources::{PageRequest, SearchSource, SourceError};

/// Default pause between two page requests
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(1000);

/// Errors returned by [`Paginator::fetch`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Sequential page walker over a search source
#[derive(Debug, Clone)]
pub struct Paginator {
    source: Arc<dyn SearchSource>,
    page_delay: Duration,
}

impl Paginator {
    pub fn new(source: Arc<dyn SearchSource>) -> Self {
        Self {
            source,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    /// Set the fixed delay slept before every page after the first
    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Fetch qualifying tweets for `query`, authenticating with `bearer_token`.
    pub async fn fetch(
        &self,
        query: &SearchQuery,
        bearer_token: &str,
    ) -> Result<ResultSet, FetchError> {
        query.validate()?;

        let filter = TweetFilter::for_query(query);
        let mut tweets = Vec::new();
        let mut pages_fetched = 0usize;
        let mut next_token: Option<String> = None;

        tracing::info!(
            source = self.source.id(),
            keyword = %query.keyword,
            target = query.target_count,
            max_pages = query.max_pages,
            "Fetching recent tweets"
        );

        let termination = loop {
            if pages_fetched > 0 {
                tokio::time::sleep(self.page_delay).await;
            }

            let request = match next_token.as_deref() {
                Some(token) => PageRequest::after(query, bearer_token, token),
                None => PageRequest::first(query, bearer_token),
            };

            let page = self.source.fetch_page(&request).await.map_err(|e| {
                tracing::warn!(page = pages_fetched + 1, error = %e, "Page request failed");
                e
            })?;
            pages_fetched += 1;

            let received = page.tweets.len();
            let kept = filter.apply(page.tweets);
            tracing::debug!(page = pages_fetched, received, kept = kept.len(), "Fetched page");
            tweets.extend(kept);
            next_token = page.next_token.filter(|t| !t.is_empty());

            if next_token.is_none() {
                break TerminationReason::NoContinuationToken;
            }
            if tweets.len() >= query.target_count {
                break TerminationReason::TargetReached;
            }
            if pages_fetched >= query.max_pages {
                break TerminationReason::PageCeilingReached;
            }
        };

        Projection::from_requested(&query.fields).apply_all(&mut tweets);

        tracing::info!(
            found = tweets.len(),
            pages = pages_fetched,
            reason = ?termination,
            "Done fetching recent tweets"
        );

        Ok(ResultSet {
            tweets,
            pages_fetched,
            termination,
        })
    }
}
