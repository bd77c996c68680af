//! Mock classifier for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::classify::{ClassifierError, ZeroShotClassifier};
use crate::models::LabelScore;

/// A classifier that returns predefined rankings.
///
/// Texts without a configured ranking get the default ranking, which is empty
/// unless set.
#[derive(Debug, Default)]
pub struct MockClassifier {
    responses: HashMap<String, Result<Vec<LabelScore>, ClassifierError>>,
    default: Vec<LabelScore>,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `ranked` for `text`.
    pub fn with_response(mut self, text: impl Into<String>, ranked: Vec<LabelScore>) -> Self {
        self.responses.insert(text.into(), Ok(ranked));
        self
    }

    /// Fail with `error` for `text`.
    pub fn with_error(mut self, text: impl Into<String>, error: ClassifierError) -> Self {
        self.responses.insert(text.into(), Err(error));
        self
    }

    /// Ranking for texts without a specific response.
    pub fn with_default(mut self, ranked: Vec<LabelScore>) -> Self {
        self.default = ranked;
        self
    }

    /// Number of `classify` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ZeroShotClassifier for MockClassifier {
    async fn classify(
        &self,
        text: &str,
        _labels: &[String],
    ) -> Result<Vec<LabelScore>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(text) {
            Some(response) => response.clone(),
            None => Ok(self.default.clone()),
        }
    }
}
