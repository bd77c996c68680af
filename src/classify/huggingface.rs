//! Hosted zero-shot classification through the Hugging Face inference API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::classify::{rank, ClassifierError, ZeroShotClassifier};
use crate::models::LabelScore;
use crate::utils::HttpClient;

/// Production inference host
pub const HUGGINGFACE_API_BASE: &str = "https://api-inference.huggingface.co";

/// BART-large MNLI fine-tuned on Yahoo Answers topics
pub const DEFAULT_MODEL: &str = "joeddav/bart-large-mnli-yahoo-answers";

/// Zero-shot classifier backed by a hosted NLI model
#[derive(Debug, Clone)]
pub struct HuggingFaceClassifier {
    client: HttpClient,
    endpoint: url::Url,
    api_token: Option<String>,
}

impl HuggingFaceClassifier {
    /// Create a classifier for `model` on the production host
    pub fn new(client: HttpClient, model: &str) -> Result<Self, ClassifierError> {
        Self::with_base_url(client, HUGGINGFACE_API_BASE, model)
    }

    /// Create a classifier against a different host
    pub fn with_base_url(
        client: HttpClient,
        base_url: &str,
        model: &str,
    ) -> Result<Self, ClassifierError> {
        let endpoint = url::Url::parse(base_url)
            .and_then(|base| base.join(&format!("/models/{}", model)))
            .map_err(|e| ClassifierError::Init(format!("invalid base URL {}: {}", base_url, e)))?;

        Ok(Self {
            client,
            endpoint,
            api_token: None,
        })
    }

    /// Authenticate with an API token (higher rate limits)
    pub fn api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl ZeroShotClassifier for HuggingFaceClassifier {
    async fn classify(
        &self,
        text: &str,
        labels: &[String],
    ) -> Result<Vec<LabelScore>, ClassifierError> {
        let body = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels: labels,
                multi_label: false,
            },
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let mut builder = self.client.client().post(self.endpoint.clone()).json(&body);
        if let Some(ref token) = self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClassifierError::Network(format!("Failed to call classifier: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: ZeroShotResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Parse(format!("Failed to parse JSON: {}", e)))?;

        let output = match data {
            ZeroShotResponse::Single(output) => output,
            ZeroShotResponse::Batch(mut outputs) => {
                if outputs.is_empty() {
                    return Err(ClassifierError::Parse("empty batch response".to_string()));
                }
                outputs.swap_remove(0)
            }
        };

        rank(output.labels, output.scores)
    }
}

// ===== Inference API Types =====

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
    options: RequestOptions,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [String],
    multi_label: bool,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Single(ZeroShotOutput),
    Batch(Vec<ZeroShotOutput>),
}

#[derive(Debug, Deserialize)]
struct ZeroShotOutput {
    labels: Vec<String>,
    scores: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn labels() -> Vec<String> {
        vec!["sports".to_string(), "politics".to_string()]
    }

    fn classifier_for(server: &mockito::ServerGuard) -> HuggingFaceClassifier {
        HuggingFaceClassifier::with_base_url(
            HttpClient::new().unwrap(),
            &server.url(),
            DEFAULT_MODEL,
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_contains_model() {
        let classifier =
            HuggingFaceClassifier::new(HttpClient::new().unwrap(), DEFAULT_MODEL).unwrap();
        assert_eq!(
            classifier.endpoint(),
            "https://api-inference.huggingface.co/models/joeddav/bart-large-mnli-yahoo-answers"
        );
    }

    #[tokio::test]
    async fn test_classify_posts_candidate_labels() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/joeddav/bart-large-mnli-yahoo-answers")
            .match_header("authorization", "Bearer hf-token")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "inputs": "What a goal!",
                "parameters": {"candidate_labels": ["sports", "politics"], "multi_label": false}
            })))
            .with_status(200)
            .with_body(
                r#"{"sequence":"What a goal!","labels":["sports","politics"],"scores":[0.93,0.07]}"#,
            )
            .create_async()
            .await;

        let ranked = classifier_for(&server)
            .api_token(Some("hf-token".to_string()))
            .classify("What a goal!", &labels())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(ranked[0], LabelScore::new("sports", 0.93));
        assert_eq!(ranked[1], LabelScore::new("politics", 0.07));
    }

    #[tokio::test]
    async fn test_classify_accepts_batch_shape() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/joeddav/bart-large-mnli-yahoo-answers")
            .with_status(200)
            .with_body(r#"[{"labels":["politics","sports"],"scores":[0.6,0.4]}]"#)
            .create_async()
            .await;

        let ranked = classifier_for(&server)
            .classify("Election night", &labels())
            .await
            .unwrap();

        assert_eq!(ranked[0].label, "politics");
    }

    #[tokio::test]
    async fn test_classify_surfaces_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/joeddav/bart-large-mnli-yahoo-answers")
            .with_status(503)
            .with_body(r#"{"error":"Model is currently loading"}"#)
            .create_async()
            .await;

        let err = classifier_for(&server)
            .classify("anything", &labels())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ClassifierError::Status {
                status: 503,
                body: r#"{"error":"Model is currently loading"}"#.to_string(),
            }
        );
    }
}
