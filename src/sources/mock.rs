//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::models::{PageResponse, Tweet};
use crate::sources::{PageRequest, SearchSource, SourceError};

/// A mock source that serves a scripted sequence of pages.
///
/// Once the script runs out every further call returns an empty last page.
#[derive(Debug, Default)]
pub struct MockSource {
    pages: Mutex<VecDeque<Result<PageResponse, SourceError>>>,
    requested_tokens: Mutex<Vec<Option<String>>>,
}

impl MockSource {
    /// Create a new mock source with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source serving `pages` in order.
    pub fn with_pages(pages: impl IntoIterator<Item = Result<PageResponse, SourceError>>) -> Self {
        Self {
            pages: Mutex::new(pages.into_iter().collect()),
            requested_tokens: Mutex::new(Vec::new()),
        }
    }

    /// Queue another page.
    pub fn push_page(&self, page: Result<PageResponse, SourceError>) {
        if let Ok(mut pages) = self.pages.lock() {
            pages.push_back(page);
        }
    }

    /// Number of `fetch_page` calls made so far.
    pub fn request_count(&self) -> usize {
        self.requested_tokens.lock().map(|t| t.len()).unwrap_or(0)
    }

    /// Continuation tokens received, one entry per call.
    pub fn requested_tokens(&self) -> Vec<Option<String>> {
        self.requested_tokens
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SearchSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<PageResponse, SourceError> {
        if let Ok(mut tokens) = self.requested_tokens.lock() {
            tokens.push(request.next_token.map(str::to_string));
        }

        let next = self.pages.lock().ok().and_then(|mut pages| pages.pop_front());
        next.unwrap_or_else(|| Ok(PageResponse::default()))
    }
}

/// Helper to build `count` English tweets with ids starting at `first_id`.
pub fn make_tweets(first_id: usize, count: usize) -> Vec<Tweet> {
    (first_id..first_id + count)
        .map(|id| Tweet::new(id.to_string(), format!("tweet number {}", id)).lang("en"))
        .collect()
}
