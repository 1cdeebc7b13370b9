//! Batch embedding fetcher
//!
//! Resolves vectors for a list of texts through the tiered cache, sending
//! only the distinct cache misses to the provider in bounded, sequential
//! chunks. Output order always matches input order, duplicates included.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::domain::cache::embedding_cache_key;
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::DomainError;
use crate::infrastructure::cache::TieredCache;
use crate::infrastructure::observability::record_embedding_request;

/// Largest batch the embedding endpoint accepts
const MAX_EMBEDDING_BATCH_SIZE: usize = 100;

/// Configuration for the batch embedding fetcher
#[derive(Debug, Clone)]
pub struct EmbeddingFetcherConfig {
    /// Embedding model requested from the provider
    pub model: String,
    /// Maximum number of texts per provider request
    pub max_batch_size: usize,
    /// Lifetime of cached vectors
    pub cache_ttl: Duration,
}

impl Default for EmbeddingFetcherConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            max_batch_size: MAX_EMBEDDING_BATCH_SIZE,
            cache_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl EmbeddingFetcherConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Clamped to `1..=MAX_EMBEDDING_BATCH_SIZE`
    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size.clamp(1, MAX_EMBEDDING_BATCH_SIZE);
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

/// Cached, deduplicated, chunked embedding lookups
#[derive(Debug)]
pub struct BatchEmbeddingFetcher {
    provider: Arc<dyn EmbeddingProvider>,
    cache: Arc<TieredCache>,
    config: EmbeddingFetcherConfig,
}

impl BatchEmbeddingFetcher {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, cache: Arc<TieredCache>) -> Self {
        Self::with_config(provider, cache, EmbeddingFetcherConfig::default())
    }

    pub fn with_config(
        provider: Arc<dyn EmbeddingProvider>,
        cache: Arc<TieredCache>,
        config: EmbeddingFetcherConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &EmbeddingFetcherConfig {
        &self.config
    }

    /// One vector per input text, in input order
    ///
    /// Fails with a provider error if any chunk request fails. Cache failures
    /// only cost extra provider calls.
    pub async fn fetch_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::with_capacity(texts.len());
        let distinct: Vec<&str> = texts
            .iter()
            .map(String::as_str)
            .filter(|text| seen.insert(*text))
            .collect();

        let mut resolved: HashMap<&str, Vec<f32>> = HashMap::with_capacity(distinct.len());
        let mut missing: Vec<&str> = Vec::new();

        let lookups = distinct.iter().map(|&text| async move {
            let vector: Option<Vec<f32>> = self.cache.get_json(&embedding_cache_key(text)).await;
            (text, vector)
        });

        for (text, vector) in join_all(lookups).await {
            match vector {
                Some(vector) => {
                    resolved.insert(text, vector);
                }
                None => missing.push(text),
            }
        }

        debug!(
            inputs = texts.len(),
            distinct = distinct.len(),
            cached = resolved.len(),
            missing = missing.len(),
            "Resolved embedding cache lookups"
        );

        if !missing.is_empty() {
            let mut writes = JoinSet::new();
            let result = self.fetch_missing(&missing, &mut resolved, &mut writes).await;
            self.join_writes(writes).await;
            result?;
        }

        texts
            .iter()
            .map(|text| {
                resolved.get(text.as_str()).cloned().ok_or_else(|| {
                    DomainError::internal(format!("No embedding resolved for text '{}'", text))
                })
            })
            .collect()
    }

    async fn fetch_missing<'a>(
        &self,
        missing: &[&'a str],
        resolved: &mut HashMap<&'a str, Vec<f32>>,
        writes: &mut JoinSet<bool>,
    ) -> Result<(), DomainError> {
        let provider_name = self.provider.provider_name();
        let chunk_size = self.config.max_batch_size.clamp(1, MAX_EMBEDDING_BATCH_SIZE);
        let total = missing.len();

        for (chunk_index, chunk) in missing.chunks(chunk_size).enumerate() {
            let start = chunk_index * chunk_size;
            let end = start + chunk.len();

            let vectors = self.fetch_chunk(chunk).await.map_err(|e| {
                let message = match e {
                    DomainError::Provider { message, .. } => message,
                    other => other.to_string(),
                };
                DomainError::provider(
                    provider_name,
                    format!(
                        "embedding chunk {}..{} ({} items) of {} failed: {}",
                        start,
                        end,
                        chunk.len(),
                        total,
                        message
                    ),
                )
            })?;

            for (&text, vector) in chunk.iter().zip(vectors) {
                let cache = self.cache.clone();
                let key = embedding_cache_key(text);
                let ttl = self.config.cache_ttl;
                let value = vector.clone();
                writes.spawn(async move { cache.set_json(&key, &value, ttl).await });

                resolved.insert(text, vector);
            }
        }

        info!(
            provider = provider_name,
            fetched = total,
            chunks = total.div_ceil(chunk_size),
            "Fetched embeddings from provider"
        );

        Ok(())
    }

    async fn fetch_chunk(&self, chunk: &[&str]) -> Result<Vec<Vec<f32>>, DomainError> {
        let provider_name = self.provider.provider_name();
        let request = EmbeddingRequest::batch(
            self.config.model.clone(),
            chunk.iter().map(|text| text.to_string()).collect(),
        );

        let started = Instant::now();
        let result = self.provider.embed(request).await;
        record_embedding_request(provider_name, chunk.len(), started.elapsed(), result.is_ok());

        result?.into_ordered_vectors(chunk.len()).ok_or_else(|| {
            DomainError::provider(
                provider_name,
                format!(
                    "response did not contain exactly one embedding for each of {} inputs",
                    chunk.len()
                ),
            )
        })
    }

    async fn join_writes(&self, mut writes: JoinSet<bool>) {
        let mut failed = 0usize;

        while let Some(result) = writes.join_next().await {
            match result {
                Ok(true) => {}
                Ok(false) => failed += 1,
                Err(e) => {
                    warn!(error = %e, "Embedding cache write task failed");
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            warn!(failed, "Some embeddings could not be cached");
        }
    }
}
