//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, EmbeddingConfig, FallbackCacheConfig, GeneratorConfig, LogFormat, LoggingConfig,
    OpenAiConfig, RedisConfig,
};
