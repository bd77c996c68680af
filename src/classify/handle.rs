//! Lazily constructed, memoizing classifier handle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

use crate::classify::{ClassifierError, ZeroShotClassifier};
use crate::models::{Classification, LabelScore, DEFAULT_THRESHOLD};

/// Builds the underlying classifier the first time it is needed
pub type ClassifierFactory =
    Box<dyn Fn() -> Result<Arc<dyn ZeroShotClassifier>, ClassifierError> + Send + Sync>;

type MemoKey = (String, Vec<String>);

/// Owns a classifier that is built on first use and remembers its answers.
///
/// Rankings are cached per `(text, labels)` for the lifetime of the handle.
/// Nothing is shared between handles.
pub struct ClassifierHandle {
    factory: ClassifierFactory,
    classifier: OnceCell<Arc<dyn ZeroShotClassifier>>,
    memo: Mutex<HashMap<MemoKey, Vec<LabelScore>>>,
    threshold: f64,
}

impl ClassifierHandle {
    /// Create a handle around a factory; nothing is built yet.
    pub fn lazy<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn ZeroShotClassifier>, ClassifierError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            classifier: OnceCell::new(),
            memo: Mutex::new(HashMap::new()),
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Create a handle around an already built classifier.
    pub fn from_classifier(classifier: Arc<dyn ZeroShotClassifier>) -> Self {
        Self::lazy(move || Ok(classifier.clone()))
    }

    /// Set the score a label has to exceed to be accepted
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Whether the underlying classifier has been built
    pub fn is_initialized(&self) -> bool {
        self.classifier.initialized()
    }

    /// Number of memoized rankings
    pub fn cached_len(&self) -> usize {
        self.memo.lock().map(|m| m.len()).unwrap_or(0)
    }

    async fn classifier(&self) -> Result<&Arc<dyn ZeroShotClassifier>, ClassifierError> {
        self.classifier
            .get_or_try_init(|| async {
                tracing::info!("Initializing zero-shot classifier");
                (self.factory)()
            })
            .await
    }

    /// Full ranking for `text`, served from the memo when possible.
    pub async fn rank(
        &self,
        text: &str,
        labels: &[String],
    ) -> Result<Vec<LabelScore>, ClassifierError> {
        let key: MemoKey = (text.to_string(), labels.to_vec());
        if let Some(hit) = self.memo.lock().ok().and_then(|m| m.get(&key).cloned()) {
            return Ok(hit);
        }

        tracing::debug!(chars = text.len(), "Generating category predictions");
        let ranked = self.classifier().await?.classify(text, labels).await?;

        if let Ok(mut memo) = self.memo.lock() {
            memo.insert(key, ranked.clone());
        }
        Ok(ranked)
    }

    /// Category for `text`, `unknown` when no label clears the threshold.
    pub async fn categorize(
        &self,
        text: &str,
        labels: &[String],
    ) -> Result<Classification, ClassifierError> {
        let ranked = self.rank(text, labels).await?;
        Ok(Classification::from_ranked(&ranked, self.threshold))
    }
}

impl std::fmt::Debug for ClassifierHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierHandle")
            .field("initialized", &self.is_initialized())
            .field("cached", &self.cached_len())
            .field("threshold", &self.threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::MockClassifier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn labels() -> Vec<String> {
        vec!["tech".to_string(), "food".to_string()]
    }

    #[tokio::test]
    async fn test_builds_classifier_once_on_first_use() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let handle = ClassifierHandle::lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(MockClassifier::new()) as Arc<dyn ZeroShotClassifier>)
        });

        assert!(!handle.is_initialized());
        assert_eq!(builds.load(Ordering::SeqCst), 0);

        handle.categorize("a", &labels()).await.unwrap();
        handle.categorize("b", &labels()).await.unwrap();

        assert!(handle.is_initialized());
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_memoizes_per_text_and_labels() {
        let mock = Arc::new(MockClassifier::new().with_default(vec![
            LabelScore::new("tech", 0.9),
            LabelScore::new("food", 0.1),
        ]));
        let handle = ClassifierHandle::from_classifier(mock.clone());

        handle.categorize("new laptop", &labels()).await.unwrap();
        handle.categorize("new laptop", &labels()).await.unwrap();
        handle
            .categorize("new laptop", &["tech".to_string()])
            .await
            .unwrap();

        assert_eq!(mock.call_count(), 2);
        assert_eq!(handle.cached_len(), 2);
    }

    #[tokio::test]
    async fn test_threshold_applied() {
        let mock = Arc::new(MockClassifier::new().with_default(vec![
            LabelScore::new("tech", 0.3),
            LabelScore::new("food", 0.2),
        ]));
        let handle = ClassifierHandle::from_classifier(mock);

        let classification = handle.categorize("hmm", &labels()).await.unwrap();
        assert_eq!(classification, Classification::unknown());

        let lenient = ClassifierHandle::from_classifier(Arc::new(
            MockClassifier::new().with_default(vec![LabelScore::new("tech", 0.3)]),
        ))
        .threshold(0.25);
        assert_eq!(lenient.categorize("hmm", &labels()).await.unwrap().category, "tech");
    }

    #[tokio::test]
    async fn test_init_failure_is_returned_and_not_cached() {
        let handle = ClassifierHandle::lazy(|| Err(ClassifierError::Init("no model".into())));

        let err = handle.categorize("a", &labels()).await.unwrap_err();
        assert_eq!(err, ClassifierError::Init("no model".into()));
        assert!(!handle.is_initialized());
        assert_eq!(handle.cached_len(), 0);
    }
}
