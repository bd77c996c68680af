//! Removal of fields the caller did not ask for.

use std::collections::BTreeSet;

use crate::models::{Tweet, TweetField};

/// The set of optional fields to keep on each returned tweet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    keep: BTreeSet<TweetField>,
}

impl Projection {
    pub fn from_requested(requested: &BTreeSet<TweetField>) -> Self {
        Self {
            keep: requested.clone(),
        }
    }

    /// Fields that will be cleared, filter fields included.
    pub fn dropped(&self) -> impl Iterator<Item = TweetField> + '_ {
        TweetField::ALL
            .into_iter()
            .filter(|field| !self.keep.contains(field))
    }

    pub fn apply(&self, tweet: &mut Tweet) {
        for field in self.dropped() {
            tweet.clear_field(field);
        }
    }

    pub fn apply_all(&self, tweets: &mut [Tweet]) {
        for tweet in tweets {
            self.apply(tweet);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_tweet() -> Tweet {
        Tweet::new("1", "text")
            .lang("en")
            .referencing("quoted", "0")
            .created_at("2020-11-19T15:00:00.000Z")
            .source("Twitter Web App")
    }

    #[test]
    fn test_drops_unrequested_filter_fields() {
        let mut tweet = full_tweet();
        Projection::from_requested(&BTreeSet::from([TweetField::Source])).apply(&mut tweet);

        assert_eq!(tweet.source.as_deref(), Some("Twitter Web App"));
        assert!(tweet.lang.is_none());
        assert!(tweet.referenced_tweets.is_none());
        assert!(tweet.created_at.is_none());
        assert_eq!(tweet.id, "1");
        assert_eq!(tweet.text, "text");
    }

    #[test]
    fn test_keeps_requested_filter_fields() {
        let mut tweet = full_tweet();
        let requested = BTreeSet::from([TweetField::Lang, TweetField::ReferencedTweets]);
        Projection::from_requested(&requested).apply(&mut tweet);

        assert_eq!(tweet.lang.as_deref(), Some("en"));
        assert!(tweet.is_repost());
        assert!(tweet.source.is_none());
    }

    #[test]
    fn test_nothing_requested_leaves_id_and_text() {
        let mut tweets = vec![full_tweet(), full_tweet()];
        Projection::from_requested(&BTreeSet::new()).apply_all(&mut tweets);
        for tweet in &tweets {
            assert_eq!(tweet, &Tweet::new("1", "text"));
        }
    }
}
