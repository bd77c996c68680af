//! Core data models for tweets, searches and analysis results.

mod analysis;
mod search;
mod tweet;

pub use analysis::{
    AnalysisReport, AnalyzedTweet, CategoryCount, Classification, Histogram, LabelScore,
    DEFAULT_THRESHOLD, UNKNOWN_CATEGORY,
};
pub use search::{
    format_timestamp, DurationBucket, PageResponse, QueryError, ResultSet, SearchQuery,
    TerminationReason, TimeWindow, DEFAULT_LANGUAGE, DEFAULT_MAX_PAGES, DEFAULT_TARGET_COUNT,
    PAGE_SIZE,
};
pub use tweet::{wire_field_list, ReferencedTweet, Tweet, TweetField};
