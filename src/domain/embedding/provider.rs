//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers (OpenAI, Cohere, etc.)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate one embedding per input text, tagged with its input index
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the default model for this provider
    fn default_model(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::embedding::{Embedding, EmbeddingUsage};
    use sha2::{Digest, Sha256};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scriptable embedding provider
    ///
    /// Texts with a registered vector get that vector; any other text gets a
    /// deterministic vector derived from its digest. Every request is recorded.
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        name: &'static str,
        dimensions: usize,
        vectors: HashMap<String, Vec<f32>>,
        error: Option<String>,
        fail_on_call: Option<usize>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl MockEmbeddingProvider {
        pub fn new(name: &'static str, dimensions: usize) -> Self {
            Self {
                name,
                dimensions,
                vectors: HashMap::new(),
                error: None,
                fail_on_call: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
            self.vectors.insert(text.into(), vector);
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        /// Fail only the n-th request (1-based)
        pub fn failing_on_call(mut self, call: usize) -> Self {
            self.fail_on_call = Some(call);
            self
        }

        /// Inputs of every request received so far
        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }

        /// Total number of texts sent across all requests
        pub fn embedded_text_count(&self) -> usize {
            self.calls.lock().unwrap().iter().map(Vec::len).sum()
        }

        pub fn vector_for(&self, text: &str) -> Vec<f32> {
            if let Some(vector) = self.vectors.get(text) {
                return vector.clone();
            }

            let digest = Sha256::digest(text.as_bytes());
            (0..self.dimensions)
                .map(|i| digest[i % digest.len()] as f32 / 255.0 - 0.5)
                .collect()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            let call_number = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(request.inputs().to_vec());
                calls.len()
            };

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            if self.fail_on_call == Some(call_number) {
                return Err(DomainError::provider(self.name, "scripted failure"));
            }

            let embeddings: Vec<Embedding> = request
                .inputs()
                .iter()
                .enumerate()
                .map(|(idx, text)| Embedding::new(idx, self.vector_for(text)))
                .collect();

            let total_tokens = request.inputs().iter().map(|t| t.len() / 4).sum::<usize>() as u32;

            Ok(EmbeddingResponse::new(
                request.model().to_string(),
                embeddings,
                EmbeddingUsage::new(total_tokens, total_tokens),
            ))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }

        fn default_model(&self) -> &'static str {
            "mock-embedding"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_provider_batch_input() {
            let provider = MockEmbeddingProvider::new("test", 16);
            let request =
                EmbeddingRequest::batch("mock-embedding", vec!["Hello".into(), "World".into()]);

            let response = provider.embed(request).await.unwrap();

            assert_eq!(response.embeddings().len(), 2);
            assert_eq!(response.embeddings()[1].index(), 1);
            assert_eq!(response.embeddings()[0].dimensions(), 16);
            assert_eq!(provider.calls(), vec![vec!["Hello".to_string(), "World".to_string()]]);
        }

        #[tokio::test]
        async fn test_mock_provider_registered_vector() {
            let provider = MockEmbeddingProvider::new("test", 3).with_vector("x", vec![1.0, 0.0, 0.0]);

            let response = provider
                .embed(EmbeddingRequest::single("mock-embedding", "x"))
                .await
                .unwrap();

            assert_eq!(response.embeddings()[0].vector(), &[1.0, 0.0, 0.0]);
        }

        #[tokio::test]
        async fn test_mock_provider_error() {
            let provider = MockEmbeddingProvider::new("test", 8).with_error("API error");

            let result = provider
                .embed(EmbeddingRequest::single("mock-embedding", "Hello"))
                .await;

            assert!(result.is_err());
            assert_eq!(provider.calls().len(), 1);
        }

        #[test]
        fn test_deterministic_embeddings() {
            let provider = MockEmbeddingProvider::new("test", 32);

            assert_eq!(provider.vector_for("Hello"), provider.vector_for("Hello"));
            assert_ne!(provider.vector_for("Hello"), provider.vector_for("World"));
        }
    }
}
