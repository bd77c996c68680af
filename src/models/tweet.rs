//! Tweet model as returned by the recent search endpoint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Optional tweet fields a caller can ask for.
///
/// `id` and `text` are always returned by the upstream and are not listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweetField {
    Source,
    CreatedAt,
    Lang,
    ReferencedTweets,
}

impl TweetField {
    /// Every selectable field, in display order.
    pub const ALL: [TweetField; 4] = [
        TweetField::Source,
        TweetField::CreatedAt,
        TweetField::Lang,
        TweetField::ReferencedTweets,
    ];

    /// Fields the paginator needs to see regardless of what the caller asked for.
    pub const FILTER_FIELDS: [TweetField; 2] = [TweetField::Lang, TweetField::ReferencedTweets];

    /// Name used in the `tweet.fields` query parameter and in output columns
    pub fn wire_name(&self) -> &'static str {
        match self {
            TweetField::Source => "source",
            TweetField::CreatedAt => "created_at",
            TweetField::Lang => "lang",
            TweetField::ReferencedTweets => "referenced_tweets",
        }
    }
}

impl std::fmt::Display for TweetField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for TweetField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TweetField::ALL
            .iter()
            .copied()
            .find(|field| field.wire_name() == s.trim())
            .ok_or_else(|| format!("unknown tweet field: {}", s))
    }
}

/// The comma-joined `tweet.fields` value for a request.
///
/// Always contains `text` plus the filter fields, so filtering works even when
/// the caller did not request them.
pub fn wire_field_list(requested: &BTreeSet<TweetField>) -> String {
    let mut fields: BTreeSet<&'static str> = BTreeSet::new();
    fields.insert("text");
    for field in TweetField::FILTER_FIELDS.iter().chain(requested.iter()) {
        fields.insert(field.wire_name());
    }
    fields.into_iter().collect::<Vec<_>>().join(",")
}

/// A reference from a tweet to another tweet (retweet, quote or reply)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencedTweet {
    /// "retweeted", "quoted" or "replied_to"
    #[serde(rename = "type")]
    pub kind: String,

    pub id: String,
}

/// A single tweet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,

    pub text: String,

    /// BCP47 language tag detected by the upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_tweets: Option<Vec<ReferencedTweet>>,

    /// Creation time (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Client used to post the tweet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Tweet {
    /// Create a tweet with only the mandatory fields set
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            lang: None,
            referenced_tweets: None,
            created_at: None,
            source: None,
        }
    }

    /// Set the language
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Add a reference to another tweet
    pub fn referencing(mut self, kind: impl Into<String>, id: impl Into<String>) -> Self {
        self.referenced_tweets
            .get_or_insert_with(Vec::new)
            .push(ReferencedTweet {
                kind: kind.into(),
                id: id.into(),
            });
        self
    }

    /// Set the creation time
    pub fn created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Set the posting client
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// A repost carries a non-empty list of referenced tweets.
    pub fn is_repost(&self) -> bool {
        self.referenced_tweets
            .as_ref()
            .is_some_and(|refs| !refs.is_empty())
    }

    /// Whether the detected language equals `lang`.
    pub fn has_language(&self, lang: &str) -> bool {
        self.lang.as_deref() == Some(lang)
    }

    /// Display value of an optional field, empty when absent.
    pub fn field_value(&self, field: TweetField) -> String {
        match field {
            TweetField::Source => self.source.clone().unwrap_or_default(),
            TweetField::CreatedAt => self.created_at.clone().unwrap_or_default(),
            TweetField::Lang => self.lang.clone().unwrap_or_default(),
            TweetField::ReferencedTweets => self
                .referenced_tweets
                .as_ref()
                .map(|refs| {
                    refs.iter()
                        .map(|r| format!("{}:{}", r.kind, r.id))
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default(),
        }
    }

    /// Clear an optional field.
    pub fn clear_field(&mut self, field: TweetField) {
        match field {
            TweetField::Source => self.source = None,
            TweetField::CreatedAt => self.created_at = None,
            TweetField::Lang => self.lang = None,
            TweetField::ReferencedTweets => self.referenced_tweets = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_repost() {
        assert!(!Tweet::new("1", "hello").is_repost());
        assert!(Tweet::new("2", "RT hello").referencing("retweeted", "1").is_repost());

        let mut empty_refs = Tweet::new("3", "hello");
        empty_refs.referenced_tweets = Some(Vec::new());
        assert!(!empty_refs.is_repost());
    }

    #[test]
    fn test_deserialize_upstream_tweet() {
        let json = r#"{
            "id": "1460323737035677698",
            "text": "Introducing a new era",
            "lang": "en",
            "referenced_tweets": [{"type": "quoted", "id": "1460323730000000000"}]
        }"#;
        let tweet: Tweet = serde_json::from_str(json).unwrap();
        assert_eq!(tweet.id, "1460323737035677698");
        assert!(tweet.has_language("en"));
        assert!(tweet.is_repost());
        assert_eq!(
            tweet.field_value(TweetField::ReferencedTweets),
            "quoted:1460323730000000000"
        );
        assert!(tweet.source.is_none());
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let value = serde_json::to_value(Tweet::new("1", "hi")).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(!object.contains_key("lang"));
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("created_at".parse::<TweetField>(), Ok(TweetField::CreatedAt));
        assert!("author_id".parse::<TweetField>().is_err());
    }

    #[test]
    fn test_wire_field_list_includes_filter_fields() {
        let requested = BTreeSet::from([TweetField::Source]);
        assert_eq!(
            wire_field_list(&requested),
            "lang,referenced_tweets,source,text"
        );
        assert_eq!(
            wire_field_list(&BTreeSet::new()),
            "lang,referenced_tweets,text"
        );
    }
}
