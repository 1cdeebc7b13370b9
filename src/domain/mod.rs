//! Domain layer - Core types, contracts and errors

pub mod cache;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod question;
pub mod report;

pub use cache::{Cache, CacheAvailability, CacheHealth, CacheKeyGenerator};
pub use embedding::{cosine_similarity, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole};
pub use question::{
    GenerationContext, GenerationOutcome, GenerationState, Question, QuestionGenerator,
    QuestionId, RegenerationFeedback, SimilarityKind, SimilarityPair,
};
pub use report::AssessmentReport;
