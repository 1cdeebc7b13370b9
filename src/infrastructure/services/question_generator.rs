//! Follow-up question generation through a chat completion provider

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::question::{
    GenerationContext, Question, QuestionGenerator, QuestionId, RegenerationFeedback,
};
use crate::domain::DomainError;

const SYSTEM_PROMPT: &str = "You are an expert career counselor designing a career assessment. \
Ask follow-up questions that dig deeper into the answers given so far. \
Every question must be distinct in meaning from the others and every option \
must be distinct from the other options of the same question. \
Respond with a JSON object of the form \
{\"questions\": [{\"question\": \"...\", \"options\": [\"...\", \"...\"]}]}.";

/// Sampling parameters for the chat provider
#[derive(Debug, Clone)]
pub struct QuestionGeneratorConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for QuestionGeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// [`QuestionGenerator`] backed by any [`LlmProvider`]
#[derive(Debug)]
pub struct LlmQuestionGenerator {
    provider: Arc<dyn LlmProvider>,
    config: QuestionGeneratorConfig,
}

impl LlmQuestionGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self::with_config(provider, QuestionGeneratorConfig::default())
    }

    pub fn with_config(provider: Arc<dyn LlmProvider>, config: QuestionGeneratorConfig) -> Self {
        Self { provider, config }
    }

    fn base_prompt(&self, context: &GenerationContext) -> String {
        format!(
            "Assessment responses so far:\n{}\n\nGenerate {} follow-up multiple choice questions.",
            serde_json::to_string_pretty(&context.assessment).unwrap_or_default(),
            context.question_count
        )
    }

    fn regeneration_prompt(&self, context: &GenerationContext, feedback: &RegenerationFeedback) -> String {
        let rejected = feedback
            .rejected
            .iter()
            .map(|q| format!("- {} [{}]", q.text(), q.options().join(" | ")))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\nA previous attempt was rejected:\n{}\n\nThese items were too similar to each other:\n{}\n\n\
Write a new set in which no two questions, and no two options of the same question, overlap in meaning.",
            self.base_prompt(context),
            rejected,
            feedback.enumerate_pairs()
        )
    }

    async fn request_questions(&self, prompt: String) -> Result<Vec<Question>, DomainError> {
        let request = LlmRequest::builder()
            .system(SYSTEM_PROMPT)
            .user(prompt)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .json_object()
            .build();

        let response = self.provider.chat(&self.config.model, request).await?;
        if response.is_truncated() {
            warn!(
                model = %self.config.model,
                max_tokens = self.config.max_tokens,
                "Question generation hit the token limit"
            );
        }

        let questions = parse_questions(self.provider.provider_name(), response.content())?;

        debug!(
            model = %self.config.model,
            count = questions.len(),
            "Parsed generated questions"
        );

        Ok(questions)
    }
}

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn generate(&self, context: &GenerationContext) -> Result<Vec<Question>, DomainError> {
        self.request_questions(self.base_prompt(context)).await
    }

    async fn regenerate(
        &self,
        context: &GenerationContext,
        feedback: &RegenerationFeedback,
    ) -> Result<Vec<Question>, DomainError> {
        self.request_questions(self.regeneration_prompt(context, feedback))
            .await
    }
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestions {
    questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
    #[serde(alias = "text")]
    question: String,
    #[serde(default)]
    options: Vec<String>,
}

fn parse_questions(provider: &str, content: &str) -> Result<Vec<Question>, DomainError> {
    let parsed: GeneratedQuestions = serde_json::from_str(content).map_err(|e| {
        DomainError::provider(provider, format!("Model returned malformed questions: {}", e))
    })?;

    if parsed.questions.is_empty() {
        return Err(DomainError::provider(provider, "Model returned no questions"));
    }

    parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(position, q)| {
            if q.question.trim().is_empty() {
                return Err(DomainError::provider(
                    provider,
                    format!("Model returned a question without text at position {}", position),
                ));
            }

            if q.options.is_empty() || q.options.iter().any(|o| o.trim().is_empty()) {
                return Err(DomainError::provider(
                    provider,
                    format!("Model returned a question without options: '{}'", q.question),
                ));
            }

            Ok(Question::new(QuestionId::generate(), q.question, q.options))
        })
        .collect()
}
