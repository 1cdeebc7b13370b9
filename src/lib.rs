//! Survey Dedup
//!
//! Embedding cache and semantic deduplication for generated career
//! assessment follow-up questions:
//! - Tiered embedding cache (Redis with an in-process fallback)
//! - Deduplicated, chunked batch embedding lookups
//! - Near-duplicate detection over questions and options
//! - A single bounded regeneration pass when duplicates are found

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use domain::cache::CacheHealth;
use domain::embedding::EmbeddingProvider;
use domain::llm::LlmProvider;
use domain::DomainError;
use infrastructure::cache::{CacheFactory, TieredCache};
use infrastructure::embedding::OpenAiEmbeddingProvider;
use infrastructure::llm::{HttpClient, OpenAiProvider};
use infrastructure::services::{
    BatchEmbeddingFetcher, LlmQuestionGenerator, RegenerationOrchestrator, ReportService,
    SimilarityDetector,
};

/// Fully wired services
#[derive(Debug)]
pub struct Engine {
    pub cache: Arc<TieredCache>,
    pub cache_health: Arc<CacheHealth>,
    pub fetcher: Arc<BatchEmbeddingFetcher>,
    pub detector: Arc<SimilarityDetector>,
    pub orchestrator: Arc<RegenerationOrchestrator>,
    pub reports: Arc<ReportService>,
    /// Default number of follow-up questions per run
    pub question_count: usize,
    monitor: Option<JoinHandle<()>>,
}

impl Engine {
    /// Waits until the remote cache is connected, its monitor gave up, or
    /// `timeout` elapsed. Returns whether the remote tier is usable.
    pub async fn wait_for_remote_cache(&self, timeout: Duration) -> bool {
        let Some(monitor) = &self.monitor else {
            return false;
        };

        let poll = async {
            while !self.cache_health.is_available() && !monitor.is_finished() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        let _ = tokio::time::timeout(timeout, poll).await;

        self.cache_health.is_available()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(monitor) = self.monitor.take() {
            monitor.abort();
        }
    }
}

/// Create the engine with the OpenAI providers described by `config`
pub async fn create_engine(config: &AppConfig) -> anyhow::Result<Engine> {
    let api_key = config
        .openai
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            DomainError::configuration("OpenAI API key is not set (OPENAI_API_KEY)")
        })?;

    let http = HttpClient::with_timeout(Duration::from_secs(config.openai.timeout_secs))?;

    let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(OpenAiEmbeddingProvider::with_base_url(
        http.clone(),
        api_key.clone(),
        config.openai.base_url.clone(),
    ));
    let llm: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::with_base_url(
        http,
        api_key,
        config.openai.base_url.clone(),
    ));

    create_engine_with_providers(config, embeddings, llm).await
}

/// Create the engine around the given providers
pub async fn create_engine_with_providers(
    config: &AppConfig,
    embeddings: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
) -> anyhow::Result<Engine> {
    let stack = CacheFactory::new().create(&config.cache_config())?;

    let fetcher = Arc::new(BatchEmbeddingFetcher::with_config(
        embeddings.clone(),
        stack.cache.clone(),
        config.fetcher_config(),
    ));
    let detector = Arc::new(SimilarityDetector::new(fetcher.clone()));
    let generator = Arc::new(LlmQuestionGenerator::with_config(
        llm.clone(),
        config.generator_config(),
    ));
    let orchestrator = Arc::new(RegenerationOrchestrator::new(generator, detector.clone()));
    let reports = Arc::new(ReportService::with_config(llm.clone(), config.generator_config()));

    info!(
        embedding_provider = embeddings.provider_name(),
        llm_provider = llm.provider_name(),
        remote_cache = stack.monitor.is_some(),
        "Engine initialized"
    );

    Ok(Engine {
        cache: stack.cache,
        cache_health: stack.health,
        fetcher,
        detector,
        orchestrator,
        reports,
        question_count: config.generator.question_count,
        monitor: stack.monitor,
    })
}
