//! Cache key generation from content

use std::fmt::Debug;

use sha2::{Digest, Sha256};

/// Namespace reserved for embedding vectors in shared cache stores
pub const EMBEDDING_NAMESPACE: &str = "embedding";

/// Trait for generating cache keys from text content
pub trait CacheKeyGenerator: Send + Sync + Debug {
    /// Generates a key for the given content
    fn generate(&self, content: &str) -> String;

    /// Generates a key with a namespace prefix
    fn generate_with_namespace(&self, namespace: &str, content: &str) -> String {
        format!("{}:{}", namespace, self.generate(content))
    }
}

/// Key generator producing hex-encoded SHA-256 digests
///
/// Digests are stable across processes, so keys written before a restart
/// stay valid afterwards.
#[derive(Debug, Clone, Default)]
pub struct ContentHashKeyGenerator;

impl ContentHashKeyGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CacheKeyGenerator for ContentHashKeyGenerator {
    fn generate(&self, content: &str) -> String {
        hex::encode(Sha256::digest(content.as_bytes()))
    }
}

/// Cache key for the embedding of `text`: `embedding:<sha256 hex>`
pub fn embedding_cache_key(text: &str) -> String {
    ContentHashKeyGenerator.generate_with_namespace(EMBEDDING_NAMESPACE, text)
}
