//! Zero-shot classification of tweet text into caller-supplied categories.
//!
//! The model itself is an external collaborator behind [`ZeroShotClassifier`].
//! [`ClassifierHandle`] builds it on first use and memoizes its answers, and
//! is passed explicitly to whoever needs it.

mod handle;
mod huggingface;
pub mod mock;

pub use handle::{ClassifierFactory, ClassifierHandle};
pub use huggingface::{HuggingFaceClassifier, DEFAULT_MODEL, HUGGINGFACE_API_BASE};
pub use mock::MockClassifier;

use async_trait::async_trait;

use crate::models::LabelScore;

/// A model that ranks candidate labels for a text.
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync + std::fmt::Debug {
    /// Return every label with its score, best first.
    async fn classify(
        &self,
        text: &str,
        labels: &[String],
    ) -> Result<Vec<LabelScore>, ClassifierError>;
}

/// Errors that can occur when classifying
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    /// The inference endpoint answered with a non-success status
    #[error("classifier returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// The classifier could not be constructed
    #[error("failed to initialize classifier: {0}")]
    Init(String),
}

/// Pair labels with scores and order them best first.
pub(crate) fn rank(
    labels: Vec<String>,
    scores: Vec<f64>,
) -> Result<Vec<LabelScore>, ClassifierError> {
    if labels.len() != scores.len() {
        return Err(ClassifierError::Parse(format!(
            "{} labels but {} scores",
            labels.len(),
            scores.len()
        )));
    }

    let mut ranked: Vec<LabelScore> = labels
        .into_iter()
        .zip(scores)
        .map(|(label, score)| LabelScore::new(label, score))
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_orders_best_first() {
        let ranked = rank(
            vec!["a".into(), "b".into(), "c".into()],
            vec![0.1, 0.7, 0.2],
        )
        .unwrap();
        let labels: Vec<&str> = ranked.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_rank_rejects_mismatched_lengths() {
        assert!(matches!(
            rank(vec!["a".into()], vec![0.1, 0.2]),
            Err(ClassifierError::Parse(_))
        ));
    }
}
