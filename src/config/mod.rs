//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `TWEET_ANALYZER_` (nested keys use
//! `__`, e.g. `TWEET_ANALYZER_TWITTER__MAX_PAGES=5`).

mod file_config;

pub use file_config::{find_config_file, write_default_config, ConfigFileError, CONFIG_FILE_NAME};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::classify::{DEFAULT_MODEL, HUGGINGFACE_API_BASE};
use crate::fetch::DEFAULT_PAGE_DELAY;
use crate::models::{DEFAULT_LANGUAGE, DEFAULT_MAX_PAGES, DEFAULT_THRESHOLD};
use crate::sources::TWITTER_API_BASE;

/// Environment variable holding the Twitter API bearer token
pub const TWITTER_TOKEN_ENV: &str = "TWITTER_API_TOKEN";

/// Environment variable holding the Hugging Face API token
pub const HUGGINGFACE_TOKEN_ENV: &str = "HF_API_TOKEN";

const ENV_PREFIX: &str = "TWEET_ANALYZER";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search API settings
    #[serde(default)]
    pub twitter: TwitterConfig,

    /// Zero-shot classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Defaults without any credentials, suitable for writing to disk
    pub fn template() -> Self {
        let mut config = Self::default();
        config.twitter.bearer_token = None;
        config.classifier.api_token = None;
        config
    }

    /// Copy with credentials masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.twitter.bearer_token = config.twitter.bearer_token.as_ref().map(|_| mask());
        config.classifier.api_token = config.classifier.api_token.as_ref().map(|_| mask());
        config
    }

    /// Pick the bearer token: explicit value, then environment, then config.
    pub fn resolve_bearer_token(&self, explicit: Option<String>) -> Option<String> {
        explicit
            .or_else(|| std::env::var(TWITTER_TOKEN_ENV).ok())
            .or_else(|| self.twitter.bearer_token.clone())
            .filter(|t| !t.trim().is_empty())
    }
}

fn mask() -> String {
    "********".to_string()
}

/// Search API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// Bearer token (falls back to `TWITTER_API_TOKEN`)
    #[serde(default = "default_bearer_token")]
    pub bearer_token: Option<String>,

    /// API host
    #[serde(default = "default_twitter_base_url")]
    pub base_url: String,

    /// Page ceiling per search
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Pause between page requests in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Language filter used when none is given
    #[serde(default = "default_language")]
    pub default_language: String,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            bearer_token: default_bearer_token(),
            base_url: default_twitter_base_url(),
            max_pages: default_max_pages(),
            page_delay_ms: default_page_delay_ms(),
            default_language: default_language(),
        }
    }
}

fn default_bearer_token() -> Option<String> {
    std::env::var(TWITTER_TOKEN_ENV).ok()
}

fn default_twitter_base_url() -> String {
    TWITTER_API_BASE.to_string()
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_page_delay_ms() -> u64 {
    DEFAULT_PAGE_DELAY.as_millis() as u64
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Zero-shot classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Inference API host
    #[serde(default = "default_classifier_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API token (falls back to `HF_API_TOKEN`)
    #[serde(default = "default_classifier_token")]
    pub api_token: Option<String>,

    /// Score a label has to exceed to be accepted
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: default_classifier_base_url(),
            model: default_model(),
            api_token: default_classifier_token(),
            threshold: default_threshold(),
        }
    }
}

fn default_classifier_base_url() -> String {
    HUGGINGFACE_API_BASE.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_classifier_token() -> Option<String> {
    std::env::var(HUGGINGFACE_TOKEN_ENV).ok()
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level used when neither `RUST_LOG` nor `-v`/`-q` is given
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Serializes tests that read or change `TWEET_ANALYZER_*` variables
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn env_guard() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_default_config() {
        let config = Config::template();
        assert_eq!(config.twitter.max_pages, 10);
        assert_eq!(config.twitter.page_delay_ms, 1000);
        assert_eq!(config.twitter.default_language, "en");
        assert_eq!(config.classifier.threshold, 0.5);
        assert_eq!(config.classifier.model, "joeddav/bart-large-mnli-yahoo-answers");
        assert!(config.twitter.bearer_token.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[twitter]
bearer_token = "file-token"
max_pages = 3
page_delay_ms = 250

[classifier]
model = "facebook/bart-large-mnli"
threshold = 0.7

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let config = {
            let _guard = env_guard();
            load_config(Some(&path)).unwrap()
        };

        assert_eq!(config.twitter.bearer_token.as_deref(), Some("file-token"));
        assert_eq!(config.twitter.max_pages, 3);
        assert_eq!(config.twitter.page_delay_ms, 250);
        assert_eq!(config.twitter.base_url, "https://api.twitter.com");
        assert_eq!(config.classifier.model, "facebook/bart-large-mnli");
        assert_eq!(config.classifier.threshold, 0.7);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[twitter]\nmax_pages = 3\n\n[classifier]\nthreshold = 0.7\n",
        )
        .unwrap();

        let config = {
            let _guard = env_guard();
            std::env::set_var("TWEET_ANALYZER_TWITTER__MAX_PAGES", "5");
            std::env::set_var("TWEET_ANALYZER_CLASSIFIER__MODEL", "facebook/bart-large-mnli");
            let loaded = load_config(Some(&path));
            std::env::remove_var("TWEET_ANALYZER_TWITTER__MAX_PAGES");
            std::env::remove_var("TWEET_ANALYZER_CLASSIFIER__MODEL");
            loaded.unwrap()
        };

        assert_eq!(config.twitter.max_pages, 5);
        assert_eq!(config.classifier.model, "facebook/bart-large-mnli");
        assert_eq!(config.classifier.threshold, 0.7);
    }

    #[test]
    fn test_load_config_missing_file_fails() {
        let path = std::path::PathBuf::from("/nonexistent/tweet-analyzer.toml");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_redacted_masks_tokens() {
        let mut config = Config::template();
        config.twitter.bearer_token = Some("secret".to_string());
        let redacted = config.redacted();
        assert_eq!(redacted.twitter.bearer_token.as_deref(), Some("********"));
        assert!(redacted.classifier.api_token.is_none());
    }

    #[test]
    fn test_explicit_token_wins() {
        let mut config = Config::template();
        config.twitter.bearer_token = Some("from-file".to_string());
        assert_eq!(
            config.resolve_bearer_token(Some("explicit".to_string())).as_deref(),
            Some("explicit")
        );
        assert_eq!(config.resolve_bearer_token(Some("  ".to_string())), None);
    }
}
