//! End-to-end analysis: check inputs, fetch tweets, classify them, count categories.

use std::sync::Arc;

use crate::classify::{ClassifierError, ClassifierHandle};
use crate::fetch::{FetchError, Paginator};
use crate::models::{AnalysisReport, QueryError, SearchQuery};
use crate::sources::SourceError;

/// Input problems that stop an analysis before any network call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("Please provide a Twitter API bearer token to continue.")]
    MissingToken,

    #[error("Please enter a search keyword to continue.")]
    EmptyKeyword,

    #[error("Please provide at least one category to classify tweets into.")]
    NoCategories,

    #[error("Invalid search: {0}")]
    InvalidQuery(QueryError),
}

/// Errors returned by [`Analyzer::run`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("Failed to fetch tweets: {0}")]
    Fetch(#[from] SourceError),

    #[error("Failed to classify tweets: {0}")]
    Classifier(#[from] ClassifierError),
}

impl From<FetchError> for AnalysisError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::InvalidQuery(e) => PreconditionError::InvalidQuery(e).into(),
            FetchError::Source(e) => AnalysisError::Fetch(e),
        }
    }
}

/// One analysis as requested by the user
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub bearer_token: Option<String>,

    pub query: SearchQuery,

    /// Candidate categories for the classifier
    pub categories: Vec<String>,
}

impl AnalysisRequest {
    pub fn new(
        bearer_token: Option<String>,
        query: SearchQuery,
        categories: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            bearer_token,
            query,
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Token, trimmed, if one was supplied.
    pub fn token(&self) -> Result<&str, PreconditionError> {
        self.bearer_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(PreconditionError::MissingToken)
    }

    /// Trimmed, non-empty, de-duplicated categories in the order given.
    pub fn clean_categories(&self) -> Vec<String> {
        let mut cleaned: Vec<String> = Vec::new();
        for category in &self.categories {
            let category = category.trim();
            if !category.is_empty() && !cleaned.iter().any(|c| c == category) {
                cleaned.push(category.to_string());
            }
        }
        cleaned
    }

    fn token_and_keyword(&self) -> Result<&str, PreconditionError> {
        let token = self.token()?;
        if self.query.keyword.trim().is_empty() {
            return Err(PreconditionError::EmptyKeyword);
        }
        Ok(token)
    }

    fn validate_query(&self) -> Result<(), PreconditionError> {
        self.query
            .validate()
            .map_err(PreconditionError::InvalidQuery)
    }

    /// Preconditions for fetching alone; categories are not consulted.
    pub fn check_fetch(&self) -> Result<&str, PreconditionError> {
        let token = self.token_and_keyword()?;
        self.validate_query()?;
        Ok(token)
    }

    /// Check every precondition, returning the token and cleaned categories.
    pub fn check(&self) -> Result<(&str, Vec<String>), PreconditionError> {
        let token = self.token_and_keyword()?;
        let categories = self.clean_categories();
        if categories.is_empty() {
            return Err(PreconditionError::NoCategories);
        }
        self.validate_query()?;
        Ok((token, categories))
    }
}

/// Runs fetch and classification for a request
#[derive(Debug, Clone)]
pub struct Analyzer {
    paginator: Paginator,
    classifier: Arc<ClassifierHandle>,
}

impl Analyzer {
    pub fn new(paginator: Paginator, classifier: Arc<ClassifierHandle>) -> Self {
        Self {
            paginator,
            classifier,
        }
    }

    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        self.run_with_progress(request, &|_, _| {}).await
    }

    /// Like [`Analyzer::run`], calling `on_progress(done, total)` after each tweet is classified.
    pub async fn run_with_progress(
        &self,
        request: &AnalysisRequest,
        on_progress: &(dyn Fn(usize, usize) + Send + Sync),
    ) -> Result<AnalysisReport, AnalysisError> {
        let (token, categories) = request.check()?;

        let results = self.paginator.fetch(&request.query, token).await?;

        tracing::info!(tweets = results.len(), "Generating histogram of tweets");
        let total = results.len();
        let mut classifications = Vec::with_capacity(total);
        for (index, tweet) in results.tweets.iter().enumerate() {
            let classification = self.classifier.categorize(&tweet.text, &categories).await?;
            tracing::debug!(
                index,
                category = %classification.category,
                confidence = classification.confidence,
                "Classified tweet"
            );
            classifications.push(classification);
            on_progress(index + 1, total);
        }

        Ok(AnalysisReport::from_results(
            request.query.keyword.clone(),
            categories,
            results,
            classifications,
        ))
    }
}
