//! Classification and report models.

use serde::{Deserialize, Serialize};

use crate::models::{ResultSet, Tweet};

/// Category assigned when the top score does not clear the threshold
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Default score a label must exceed to be accepted
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// A candidate label and its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// The category picked for one tweet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub confidence: f64,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            category: UNKNOWN_CATEGORY.to_string(),
            confidence: 0.0,
        }
    }

    /// Pick the top-ranked label if its score is strictly above `threshold`.
    ///
    /// `ranked` must be ordered best-first.
    pub fn from_ranked(ranked: &[LabelScore], threshold: f64) -> Self {
        match ranked.first() {
            Some(top) if top.score > threshold => Self {
                category: top.label.clone(),
                confidence: top.score,
            },
            _ => Self::unknown(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.category == UNKNOWN_CATEGORY
    }
}

/// A tweet with its predicted category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedTweet {
    #[serde(flatten)]
    pub tweet: Tweet,

    pub predicted_category: String,

    pub confidence: f64,
}

impl AnalyzedTweet {
    pub fn new(tweet: Tweet, classification: Classification) -> Self {
        Self {
            tweet,
            predicted_category: classification.category,
            confidence: classification.confidence,
        }
    }
}

/// Count of tweets in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Category counts, in the order categories were first seen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    buckets: Vec<CategoryCount>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one tweet in `category`.
    pub fn record(&mut self, category: &str) {
        match self.buckets.iter_mut().find(|b| b.category == category) {
            Some(bucket) => bucket.count += 1,
            None => self.buckets.push(CategoryCount {
                category: category.to_string(),
                count: 1,
            }),
        }
    }

    pub fn get(&self, category: &str) -> usize {
        self.buckets
            .iter()
            .find(|b| b.category == category)
            .map(|b| b.count)
            .unwrap_or(0)
    }

    pub fn buckets(&self) -> &[CategoryCount] {
        &self.buckets
    }

    /// Largest bucket count, 0 when empty
    pub fn max_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for Histogram {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut histogram = Histogram::new();
        for category in iter {
            histogram.record(category);
        }
        histogram
    }
}

/// Everything the UI needs to render one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub keyword: String,

    pub categories: Vec<String>,

    pub tweets: Vec<AnalyzedTweet>,

    pub histogram: Histogram,

    pub pages_fetched: usize,
}

impl AnalysisReport {
    /// Build a report from a fetched result set and one classification per tweet.
    pub fn from_results(
        keyword: impl Into<String>,
        categories: Vec<String>,
        results: ResultSet,
        classifications: Vec<Classification>,
    ) -> Self {
        let pages_fetched = results.pages_fetched;
        let tweets: Vec<AnalyzedTweet> = results
            .tweets
            .into_iter()
            .zip(classifications)
            .map(|(tweet, classification)| AnalyzedTweet::new(tweet, classification))
            .collect();
        let histogram = tweets
            .iter()
            .map(|t| t.predicted_category.as_str())
            .collect();

        Self {
            keyword: keyword.into(),
            categories,
            tweets,
            histogram,
            pages_fetched,
        }
    }
}
