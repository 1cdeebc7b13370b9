//! Infrastructure services

mod embedding_fetcher;
mod question_generator;
mod regeneration;
mod report;
mod similarity_detector;

pub use embedding_fetcher::{BatchEmbeddingFetcher, EmbeddingFetcherConfig};
pub use question_generator::{LlmQuestionGenerator, QuestionGeneratorConfig};
pub use regeneration::RegenerationOrchestrator;
pub use report::ReportService;
pub use similarity_detector::SimilarityDetector;
