//! OpenAI embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::embedding::{
    Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage,
};
use crate::domain::DomainError;
use crate::infrastructure::llm::HttpClientTrait;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Known OpenAI embedding models and their dimensions
const EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("text-embedding-3-small", 1536),
    ("text-embedding-3-large", 3072),
    ("text-embedding-ada-002", 1536),
];

/// OpenAI embedding provider
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    /// Create a new OpenAI embedding provider
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    /// Create a new provider with custom base URL
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let api_key = api_key.into();
        let auth_header = format!("Bearer {}", api_key);
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    /// Output dimensions of a known model
    pub fn dimensions(model: &str) -> Option<usize> {
        EMBEDDING_MODELS
            .iter()
            .find(|(name, _)| *name == model)
            .map(|(_, dims)| *dims)
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, request: &EmbeddingRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": request.model(),
            "input": request.inputs(),
        });

        if let Some(dims) = request.dimensions() {
            body["dimensions"] = serde_json::json!(dims);
        }

        body
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<EmbeddingResponse, DomainError> {
        let response: OpenAiEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse embedding response: {}", e))
        })?;

        let embeddings: Vec<Embedding> = response
            .data
            .into_iter()
            .map(|d| Embedding::new(d.index, d.embedding))
            .collect();

        let usage = EmbeddingUsage::new(response.usage.prompt_tokens, response.usage.total_tokens);

        Ok(EmbeddingResponse::new(response.model, embeddings, usage))
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        if request.is_empty() {
            return Err(DomainError::validation("Embedding request has no input"));
        }

        let url = self.embeddings_url();
        let body = self.build_request(&request);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| match e {
                DomainError::Provider { message, .. } => DomainError::provider("openai", message),
                other => other,
            })?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &'static str {
        "text-embedding-3-small"
    }
}

// OpenAI API types for embeddings

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    model: String,
    data: Vec<OpenAiEmbeddingData>,
    #[serde(default)]
    usage: OpenAiEmbeddingUsage,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAiEmbeddingUsage {
    prompt_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::{HttpClient, MockHttpClient};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
    const MODEL: &str = "text-embedding-3-small";

    /// Embeddings endpoint payload returning `vectors` in request order
    fn embeddings_payload(vectors: &[Vec<f32>]) -> serde_json::Value {
        let data: Vec<serde_json::Value> = vectors
            .iter()
            .enumerate()
            .map(|(index, vector)| {
                serde_json::json!({ "object": "embedding", "index": index, "embedding": vector })
            })
            .collect();

        serde_json::json!({
            "object": "list",
            "model": MODEL,
            "data": data,
            "usage": { "prompt_tokens": 12, "total_tokens": 12 }
        })
    }

    fn question_texts() -> Vec<String> {
        vec![
            "Do you enjoy leading teams?".to_string(),
            "Yes".to_string(),
            "No".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_embed_question_set() {
        let client = MockHttpClient::new().with_response(
            EMBEDDINGS_URL,
            embeddings_payload(&[vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]]),
        );
        let provider = OpenAiEmbeddingProvider::new(client, "sk-test");

        let response = provider
            .embed(EmbeddingRequest::batch(MODEL, question_texts()))
            .await
            .unwrap();

        assert_eq!(response.model(), MODEL);
        assert_eq!(response.usage().prompt_tokens(), 12);
        assert_eq!(
            response.into_ordered_vectors(3),
            Some(vec![vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]])
        );

        let body = &provider.client.request_bodies()[0];
        assert_eq!(body["model"], MODEL);
        assert_eq!(body["input"], serde_json::json!(question_texts()));
        assert!(body.get("dimensions").is_none());
    }

    #[tokio::test]
    async fn test_dimensions_forwarded() {
        let client = MockHttpClient::new()
            .with_response(EMBEDDINGS_URL, embeddings_payload(&[vec![0.0; 256]]));
        let provider = OpenAiEmbeddingProvider::new(client, "sk-test");

        let response = provider
            .embed(EmbeddingRequest::single(MODEL, "Yes").with_dimensions(256))
            .await
            .unwrap();

        assert_eq!(response.embeddings()[0].dimensions(), 256);
        assert_eq!(provider.client.request_bodies()[0]["dimensions"], 256);
    }

    #[tokio::test]
    async fn test_missing_usage_defaults_to_zero() {
        let payload = serde_json::json!({
            "model": MODEL,
            "data": [{ "index": 0, "embedding": [1.0] }]
        });
        let client = MockHttpClient::new().with_response(EMBEDDINGS_URL, payload);
        let provider = OpenAiEmbeddingProvider::new(client, "sk-test");

        let response = provider
            .embed(EmbeddingRequest::single(MODEL, "Yes"))
            .await
            .unwrap();

        assert_eq!(response.usage().total_tokens(), 0);
    }

    #[tokio::test]
    async fn test_http_error_is_attributed_to_openai() {
        let client = MockHttpClient::new().with_error(EMBEDDINGS_URL, "HTTP 429: quota exceeded");
        let provider = OpenAiEmbeddingProvider::new(client, "sk-test");

        let result = provider.embed(EmbeddingRequest::single(MODEL, "Yes")).await;

        match result {
            Err(DomainError::Provider { provider, message }) => {
                assert_eq!(provider, "openai");
                assert!(message.contains("quota exceeded"));
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_request_is_rejected_locally() {
        let provider = OpenAiEmbeddingProvider::new(MockHttpClient::new(), "sk-test");

        let result = provider.embed(EmbeddingRequest::batch(MODEL, vec![])).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(provider.client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unexpected_payload() {
        let client = MockHttpClient::new()
            .with_response(EMBEDDINGS_URL, serde_json::json!({ "error": "nope" }));
        let provider = OpenAiEmbeddingProvider::new(client, "sk-test");

        let error = provider
            .embed(EmbeddingRequest::single(MODEL, "Yes"))
            .await
            .unwrap_err();

        assert!(error.to_string().contains("Failed to parse embedding response"));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash() {
        let url = "http://proxy.internal:8080/v1/embeddings";
        let client = MockHttpClient::new().with_response(url, embeddings_payload(&[vec![1.0]]));
        let provider =
            OpenAiEmbeddingProvider::with_base_url(client, "sk-test", "http://proxy.internal:8080/");

        provider
            .embed(EmbeddingRequest::single(MODEL, "Yes"))
            .await
            .unwrap();

        assert_eq!(provider.client.requests()[0].0, url);
    }

    #[tokio::test]
    async fn test_out_of_order_response_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("Authorization", "Bearer sk-live"))
            .and(body_partial_json(serde_json::json!({
                "model": MODEL,
                "input": ["Remote", "In an office"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": MODEL,
                "data": [
                    { "index": 1, "embedding": [0.0, 1.0] },
                    { "index": 0, "embedding": [1.0, 0.0] }
                ],
                "usage": { "prompt_tokens": 4, "total_tokens": 4 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            OpenAiEmbeddingProvider::with_base_url(HttpClient::new(), "sk-live", server.uri());
        let response = provider
            .embed(EmbeddingRequest::batch(
                MODEL,
                vec!["Remote".into(), "In an office".into()],
            ))
            .await
            .unwrap();

        let vectors = response.into_ordered_vectors(2).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_known_model_dimensions() {
        let provider = OpenAiEmbeddingProvider::new(MockHttpClient::new(), "sk-test");

        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.default_model(), MODEL);
        assert_eq!(
            OpenAiEmbeddingProvider::<MockHttpClient>::dimensions("text-embedding-3-large"),
            Some(3072)
        );
        assert_eq!(OpenAiEmbeddingProvider::<MockHttpClient>::dimensions("word2vec"), None);
    }
}
