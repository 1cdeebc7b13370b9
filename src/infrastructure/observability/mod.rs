//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    init_metrics, record_cache_lookup, record_embedding_request, record_regeneration,
    CacheLookupResult,
};
