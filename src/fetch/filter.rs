//! Per-page tweet filters.

use crate::models::{SearchQuery, Tweet};

/// Decides which tweets of a page are kept.
///
/// Reposts are checked before language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetFilter {
    language: String,
    include_retweets: bool,
}

impl TweetFilter {
    pub fn new(language: impl Into<String>, include_retweets: bool) -> Self {
        Self {
            language: language.into(),
            include_retweets,
        }
    }

    pub fn for_query(query: &SearchQuery) -> Self {
        Self::new(query.language.clone(), query.include_retweets)
    }

    pub fn accepts(&self, tweet: &Tweet) -> bool {
        if !self.include_retweets && tweet.is_repost() {
            return false;
        }
        tweet.has_language(&self.language)
    }

    /// Keep accepted tweets in their original order.
    pub fn apply(&self, tweets: Vec<Tweet>) -> Vec<Tweet> {
        tweets.into_iter().filter(|t| self.accepts(t)).collect()
    }
}
