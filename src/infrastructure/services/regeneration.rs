//! Generate, check and at most once regenerate follow-up questions

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::question::{
    GenerationContext, GenerationOutcome, GenerationState, Question, QuestionGenerator,
    RegenerationFeedback, SimilarityPair,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_regeneration;

use super::similarity_detector::SimilarityDetector;

/// Runs the `Generated -> Checked -> Final` flow
///
/// A candidate set with near-duplicates is regenerated exactly once and the
/// replacement is accepted without another check.
pub struct RegenerationOrchestrator {
    generator: Arc<dyn QuestionGenerator>,
    detector: Arc<SimilarityDetector>,
}

impl std::fmt::Debug for RegenerationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegenerationOrchestrator")
            .field("detector", &self.detector)
            .finish_non_exhaustive()
    }
}

impl RegenerationOrchestrator {
    pub fn new(generator: Arc<dyn QuestionGenerator>, detector: Arc<SimilarityDetector>) -> Self {
        Self {
            generator,
            detector,
        }
    }

    pub async fn run(&self, context: &GenerationContext) -> Result<GenerationOutcome, DomainError> {
        let mut state = GenerationState::Generated;
        let mut questions: Vec<Question> = self.generator.generate(context).await?;
        let mut duplicates: Vec<SimilarityPair> = Vec::new();
        let mut regenerated = false;

        debug!(count = questions.len(), "Generated candidate questions");

        loop {
            state = match state {
                GenerationState::Generated => {
                    duplicates = self.detector.detect(&questions).await?;
                    GenerationState::Checked
                }
                GenerationState::Checked if duplicates.is_empty() => GenerationState::Final,
                GenerationState::Checked => {
                    info!(
                        pairs = duplicates.len(),
                        "Regenerating follow-up questions to remove near-duplicates"
                    );

                    let feedback = RegenerationFeedback::new(questions, duplicates.clone());
                    questions = self.generator.regenerate(context, &feedback).await?;
                    regenerated = true;
                    record_regeneration();

                    GenerationState::Final
                }
                GenerationState::Final => break,
            };
        }

        Ok(GenerationOutcome {
            questions,
            duplicates,
            regenerated,
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{CacheHealth, MockCache};
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::question::{MockQuestionGenerator, SimilarityKind};
    use crate::infrastructure::cache::TieredCache;
    use crate::infrastructure::services::BatchEmbeddingFetcher;
    use mockall::predicate::always;

    fn detector(provider: MockEmbeddingProvider) -> Arc<SimilarityDetector> {
        let cache = Arc::new(TieredCache::new(
            Arc::new(MockCache::new()),
            Arc::new(CacheHealth::new()),
        ));
        let fetcher = Arc::new(BatchEmbeddingFetcher::new(Arc::new(provider), cache));
        Arc::new(SimilarityDetector::new(fetcher))
    }

    fn vectors() -> MockEmbeddingProvider {
        MockEmbeddingProvider::new("mock", 3)
            .with_vector("Do you enjoy teamwork?", vec![1.0, 0.0, 0.0])
            .with_vector("Do you like working in teams?", vec![0.99, 0.1, 0.0])
            .with_vector("What pace of work suits you?", vec![0.0, 1.0, 0.0])
            .with_vector("Yes", vec![0.0, 0.0, 1.0])
            .with_vector("No", vec![0.0, 1.0, 0.0])
    }

    fn question(id: &str, text: &str) -> Question {
        Question::new(id, text, vec!["Yes".to_string(), "No".to_string()])
    }

    fn context() -> GenerationContext {
        GenerationContext::new(serde_json::json!({ "role": "analyst" }), 2)
    }

    #[tokio::test]
    async fn test_clean_set_is_final_without_regeneration() {
        let mut generator = MockQuestionGenerator::new();
        generator.expect_generate().times(1).returning(|_| {
            Ok(vec![
                question("q1", "Do you enjoy teamwork?"),
                question("q2", "What pace of work suits you?"),
            ])
        });
        generator.expect_regenerate().times(0);

        let orchestrator = RegenerationOrchestrator::new(Arc::new(generator), detector(vectors()));
        let outcome = orchestrator.run(&context()).await.unwrap();

        assert_eq!(outcome.state, GenerationState::Final);
        assert!(!outcome.regenerated);
        assert!(outcome.duplicates.is_empty());
        assert_eq!(outcome.questions.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicates_trigger_single_regeneration() {
        let mut generator = MockQuestionGenerator::new();
        generator.expect_generate().times(1).returning(|_| {
            Ok(vec![
                question("q1", "Do you enjoy teamwork?"),
                question("q2", "Do you like working in teams?"),
            ])
        });
        generator
            .expect_regenerate()
            .with(always(), always())
            .times(1)
            .returning(|_, feedback| {
                assert_eq!(feedback.rejected.len(), 2);
                assert_eq!(feedback.pairs.len(), 1);
                assert_eq!(feedback.pairs[0].kind, SimilarityKind::Questions);
                assert!(feedback.enumerate_pairs().starts_with("1. "));

                Ok(vec![
                    question("q3", "Do you enjoy teamwork?"),
                    question("q4", "What pace of work suits you?"),
                ])
            });

        let orchestrator = RegenerationOrchestrator::new(Arc::new(generator), detector(vectors()));
        let outcome = orchestrator.run(&context()).await.unwrap();

        assert_eq!(outcome.state, GenerationState::Final);
        assert!(outcome.regenerated);
        assert_eq!(outcome.duplicates.len(), 1);
        assert_eq!(outcome.questions[1].id().as_str(), "q4");
    }

    #[tokio::test]
    async fn test_regenerated_set_is_accepted_unchecked() {
        let provider = vectors();
        let mut generator = MockQuestionGenerator::new();
        generator.expect_generate().times(1).returning(|_| {
            Ok(vec![
                question("q1", "Do you enjoy teamwork?"),
                question("q2", "Do you like working in teams?"),
            ])
        });
        // Still duplicated, but there is no second regeneration
        generator.expect_regenerate().times(1).returning(|_, _| {
            Ok(vec![
                question("q3", "Do you enjoy teamwork?"),
                question("q4", "Do you like working in teams?"),
            ])
        });

        let orchestrator = RegenerationOrchestrator::new(Arc::new(generator), detector(provider));
        let outcome = orchestrator.run(&context()).await.unwrap();

        assert!(outcome.regenerated);
        assert_eq!(outcome.state, GenerationState::Final);
        assert_eq!(outcome.questions[0].id().as_str(), "q3");
    }

    #[tokio::test]
    async fn test_generation_error_propagates() {
        let mut generator = MockQuestionGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Err(DomainError::provider("openai", "HTTP 500")));
        generator.expect_regenerate().times(0);

        let orchestrator = RegenerationOrchestrator::new(Arc::new(generator), detector(vectors()));
        let result = orchestrator.run(&context()).await;

        match result {
            Err(DomainError::Provider { provider, message }) => {
                assert_eq!(provider, "openai");
                assert_eq!(message, "HTTP 500");
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_regeneration_error_propagates() {
        let mut generator = MockQuestionGenerator::new();
        generator.expect_generate().times(1).returning(|_| {
            Ok(vec![
                question("q1", "Do you enjoy teamwork?"),
                question("q2", "Do you like working in teams?"),
            ])
        });
        generator
            .expect_regenerate()
            .times(1)
            .returning(|_, _| Err(DomainError::provider("openai", "timeout")));

        let orchestrator = RegenerationOrchestrator::new(Arc::new(generator), detector(vectors()));

        assert!(orchestrator.run(&context()).await.unwrap_err().is_provider());
    }

    #[tokio::test]
    async fn test_embedding_error_propagates() {
        let mut generator = MockQuestionGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Ok(vec![question("q1", "Do you enjoy teamwork?")]));
        generator.expect_regenerate().times(0);

        let orchestrator = RegenerationOrchestrator::new(
            Arc::new(generator),
            detector(MockEmbeddingProvider::new("mock", 3).with_error("quota exceeded")),
        );

        let error = orchestrator.run(&context()).await.unwrap_err();
        assert!(error.to_string().contains("quota exceeded"));
    }
}
