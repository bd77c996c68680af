//! Search query, page and result set models.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{Tweet, TweetField};

/// Number of tweets requested per page (the upstream maximum)
pub const PAGE_SIZE: usize = 100;

/// Default ceiling on the number of pages fetched for one query
pub const DEFAULT_MAX_PAGES: usize = 10;

/// Default number of qualifying tweets to collect
pub const DEFAULT_TARGET_COUNT: usize = 50;

/// Default language filter
pub const DEFAULT_LANGUAGE: &str = "en";

/// Errors raised by [`SearchQuery::validate`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("search keyword is empty")]
    EmptyKeyword,

    #[error("language code is empty")]
    EmptyLanguage,

    #[error("target count must be greater than zero")]
    ZeroTargetCount,

    #[error("max pages must be greater than zero")]
    ZeroMaxPages,

    #[error("time window start {start} is not before end {end}")]
    InvertedWindow { start: String, end: String },
}

/// A half-open time window `[start, end)` for a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window, rejecting `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, QueryError> {
        if start >= end {
            return Err(QueryError::InvertedWindow {
                start: format_timestamp(&start),
                end: format_timestamp(&end),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// RFC3339 with second precision and a `Z` suffix, as the upstream expects.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// How far back to search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBucket {
    Last4Hours,
    Last8Hours,
    Last24Hours,
    Last48Hours,
    Last72Hours,
}

impl DurationBucket {
    /// The upstream refuses end times too close to the request time.
    const END_OFFSET_SECS: i64 = 30;

    pub fn hours(&self) -> i64 {
        match self {
            DurationBucket::Last4Hours => 4,
            DurationBucket::Last8Hours => 8,
            DurationBucket::Last24Hours => 24,
            DurationBucket::Last48Hours => 48,
            DurationBucket::Last72Hours => 72,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> String {
        format!("Last {} hours", self.hours())
    }

    /// The window covered by this bucket when searching at `now`.
    pub fn window_ending(&self, now: DateTime<Utc>) -> TimeWindow {
        let end = now - Duration::seconds(Self::END_OFFSET_SECS);
        let start = end - Duration::hours(self.hours());
        TimeWindow { start, end }
    }
}

/// Parameters for a paginated recent search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search keyword (upstream query syntax is passed through)
    pub keyword: String,

    /// Only tweets with this language are kept
    pub language: String,

    /// Optional fields the caller wants to see in the result
    pub fields: BTreeSet<TweetField>,

    /// Time window to search in
    pub window: Option<TimeWindow>,

    /// Whether retweets, quotes and replies are kept
    pub include_retweets: bool,

    /// Stop paging once this many qualifying tweets are collected
    pub target_count: usize,

    /// Hard ceiling on pages fetched
    pub max_pages: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            fields: BTreeSet::new(),
            window: None,
            include_retweets: false,
            target_count: DEFAULT_TARGET_COUNT,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Default::default()
        }
    }

    /// Set the language filter
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Request an optional field
    pub fn field(mut self, field: TweetField) -> Self {
        self.fields.insert(field);
        self
    }

    /// Request a set of optional fields
    pub fn fields(mut self, fields: impl IntoIterator<Item = TweetField>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Set the time window
    pub fn window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Keep or drop reposts
    pub fn include_retweets(mut self, include: bool) -> Self {
        self.include_retweets = include;
        self
    }

    /// Set the target count
    pub fn target_count(mut self, count: usize) -> Self {
        self.target_count = count;
        self
    }

    /// Set the page ceiling
    pub fn max_pages(mut self, pages: usize) -> Self {
        self.max_pages = pages;
        self
    }

    /// Page size is fixed.
    pub fn page_size(&self) -> usize {
        PAGE_SIZE
    }

    /// Requested optional fields in column order.
    pub fn display_fields(&self) -> Vec<TweetField> {
        self.fields.iter().copied().collect()
    }

    /// Check the query invariants.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.keyword.trim().is_empty() {
            return Err(QueryError::EmptyKeyword);
        }
        if self.language.trim().is_empty() {
            return Err(QueryError::EmptyLanguage);
        }
        if self.target_count == 0 {
            return Err(QueryError::ZeroTargetCount);
        }
        if self.max_pages == 0 {
            return Err(QueryError::ZeroMaxPages);
        }
        if let Some(window) = &self.window {
            TimeWindow::new(window.start, window.end)?;
        }
        Ok(())
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResponse {
    pub tweets: Vec<Tweet>,

    /// Continuation token; `None` on the last page
    pub next_token: Option<String>,
}

impl PageResponse {
    /// Create a page, treating an empty token as absent.
    pub fn new(tweets: Vec<Tweet>, next_token: Option<String>) -> Self {
        Self {
            tweets,
            next_token: next_token.filter(|t| !t.is_empty()),
        }
    }

    /// A page without continuation
    pub fn last(tweets: Vec<Tweet>) -> Self {
        Self::new(tweets, None)
    }

    pub fn is_last(&self) -> bool {
        self.next_token.as_deref().map_or(true, str::is_empty)
    }
}

/// Why pagination stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The latest page carried no continuation token
    NoContinuationToken,
    /// Enough qualifying tweets were collected
    TargetReached,
    /// The page ceiling was hit
    PageCeilingReached,
}

/// Qualifying tweets in fetch order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    pub tweets: Vec<Tweet>,

    /// Number of page requests made
    pub pages_fetched: usize,

    pub termination: TerminationReason,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.tweets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
    }
}
