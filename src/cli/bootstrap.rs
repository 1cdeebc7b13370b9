//! Shared startup for the subcommands

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::observability::init_metrics;
use crate::{create_engine, Engine};

/// Load configuration, install logging and metrics, and build the engine
pub(crate) async fn start() -> anyhow::Result<Engine> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    if let Some(addr) = init_metrics(&config.metrics) {
        info!(%addr, "Metrics exporter listening");
    }

    let engine = create_engine(&config).await?;

    if config.redis.enabled {
        let timeout = Duration::from_secs(config.redis.connect_timeout_secs);
        if !engine.wait_for_remote_cache(timeout).await {
            warn!(
                host = %config.redis.host,
                port = config.redis.port,
                "Redis unavailable, using the in-process cache"
            );
        }
    }

    Ok(engine)
}

pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::question::Question;

    fn temp_file(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("survey-dedup-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_read_questions() {
        let path = temp_file(r#"[{"id": "q1", "text": "Why?", "options": ["A", "B"]}]"#);

        let questions: Vec<Question> = read_json(&path).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id().as_str(), "q1");
        assert_eq!(questions[0].options(), ["A", "B"]);
    }

    #[tokio::test]
    async fn test_read_invalid_json() {
        let path = temp_file("{ not json");

        let error = read_json::<serde_json::Value>(&path).await.unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(error.to_string().contains("invalid JSON"));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let path = std::env::temp_dir().join("survey-dedup-does-not-exist.json");

        let error = read_json::<serde_json::Value>(&path).await.unwrap_err();

        assert!(error.to_string().contains("failed to read"));
    }
}
