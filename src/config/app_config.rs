use std::time::Duration;

use serde::Deserialize;

use crate::infrastructure::cache::{CacheConfig, RedisCacheConfig, RetryPolicy};
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::services::{EmbeddingFetcherConfig, QuestionGeneratorConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub redis: RedisConfig,
    pub fallback_cache: FallbackCacheConfig,
    pub embedding: EmbeddingConfig,
    pub generator: GeneratorConfig,
    pub openai: OpenAiConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Remote cache tier
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub key_prefix: Option<String>,
    pub max_retries: u32,
    pub retry_step_ms: u64,
    pub retry_cap_ms: u64,
    pub health_check_interval_secs: u64,
    pub connect_timeout_secs: u64,
}

/// In-process cache tier
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FallbackCacheConfig {
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub max_batch_size: usize,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Follow-up questions requested per run
    pub question_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 6379,
            key_prefix: None,
            max_retries: 3,
            retry_step_ms: 50,
            retry_cap_ms: 2000,
            health_check_interval_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}

impl Default for FallbackCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            max_batch_size: 100,
            cache_ttl_secs: 86_400,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            question_count: 5,
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Layered load: config files, then `APP__` variables, then the
    /// conventional `REDIS_HOST`, `REDIS_PORT` and `OPENAI_API_KEY`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("redis.host", std::env::var("REDIS_HOST").ok())?
            .set_override_option("redis.port", std::env::var("REDIS_PORT").ok())?
            .set_override_option("openai.api_key", std::env::var("OPENAI_API_KEY").ok())?
            .build()?;

        config.try_deserialize()
    }

    pub fn cache_config(&self) -> CacheConfig {
        let redis = &self.redis;

        let mut cache = CacheConfig::in_memory()
            .with_max_capacity(self.fallback_cache.max_capacity)
            .with_check_interval(Duration::from_secs(redis.health_check_interval_secs))
            .with_retry(RetryPolicy::new(
                redis.max_retries,
                Duration::from_millis(redis.retry_step_ms),
                Duration::from_millis(redis.retry_cap_ms),
            ));

        if redis.enabled {
            let mut remote = RedisCacheConfig::new(redis.host.clone(), redis.port)
                .with_connection_timeout(Duration::from_secs(redis.connect_timeout_secs));
            if let Some(prefix) = &redis.key_prefix {
                remote = remote.with_key_prefix(prefix.clone());
            }
            cache.remote = Some(remote);
        }

        cache
    }

    pub fn fetcher_config(&self) -> EmbeddingFetcherConfig {
        EmbeddingFetcherConfig::default()
            .with_model(self.embedding.model.clone())
            .with_max_batch_size(self.embedding.max_batch_size)
            .with_cache_ttl(Duration::from_secs(self.embedding.cache_ttl_secs))
    }

    pub fn generator_config(&self) -> QuestionGeneratorConfig {
        QuestionGeneratorConfig {
            model: self.generator.model.clone(),
            temperature: self.generator.temperature,
            max_tokens: self.generator.max_tokens,
        }
    }
}
