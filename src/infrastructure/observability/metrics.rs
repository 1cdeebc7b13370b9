//! Prometheus metrics infrastructure

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use super::config::MetricsConfig;

/// Outcome of a single cache tier lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookupResult {
    Hit,
    Miss,
    Error,
}

impl CacheLookupResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheLookupResult::Hit => "hit",
            CacheLookupResult::Miss => "miss",
            CacheLookupResult::Error => "error",
        }
    }
}

/// Install the Prometheus recorder with its scrape listener
///
/// Returns the bound address, or `None` when metrics are disabled or the
/// exporter could not be installed.
pub fn init_metrics(config: &MetricsConfig) -> Option<SocketAddr> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    let addr: SocketAddr = match config.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(
                "Invalid metrics listen address '{}': {}",
                config.listen_addr,
                e
            );
            return None;
        }
    };

    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            register_default_metrics();
            tracing::info!("Prometheus metrics listening on {}", addr);
            Some(addr)
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn register_default_metrics() {
    gauge!("survey_dedup_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a lookup against one cache tier
pub fn record_cache_lookup(tier: &str, result: CacheLookupResult) {
    let labels = [
        ("tier", tier.to_string()),
        ("result", result.as_str().to_string()),
    ];

    counter!("embedding_cache_lookups_total", &labels).increment(1);
}

/// Record one embedding provider request (one chunk)
pub fn record_embedding_request(provider: &str, items: usize, duration: Duration, success: bool) {
    let labels = [
        ("provider", provider.to_string()),
        ("status", if success { "success" } else { "error" }.to_string()),
    ];

    counter!("embedding_provider_requests_total", &labels).increment(1);
    histogram!("embedding_provider_request_duration_seconds", &labels)
        .record(duration.as_secs_f64());

    if success {
        counter!("embedding_provider_items_total", "provider" => provider.to_string())
            .increment(items as u64);
    }
}

/// Record a regeneration pass of the follow-up questions
pub fn record_regeneration() {
    counter!("question_regenerations_total").increment(1);
}
