//! Career assessment report generation

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::report::AssessmentReport;
use crate::domain::DomainError;

use super::question_generator::QuestionGeneratorConfig;

const SYSTEM_PROMPT: &str = "You are an expert career counselor. Analyze the assessment \
responses and respond with a JSON object with exactly these keys: \
\"Core Strengths\" (4-5 specific strengths supported by the responses), \
\"Primary Career Paths\" (object with \"careers\": exactly 6 objects with \"title\" (a real job \
title, not a general field), \"company_type\", \"match_score\" (0-100), \
\"salary_range\" {\"min\", \"max\"} and \"growth_potential\" (0-100)), \
\"Work Environment\" (4-5 characteristics of the ideal workplace), \
\"Development Plan\" (4-5 development actions) and \
\"Action Items\" (four strings prefixed \"30 Days:\", \"90 Days:\", \"6 Months:\" and \"12 Months:\").";

/// Turns assessment responses into an [`AssessmentReport`]
#[derive(Debug)]
pub struct ReportService {
    provider: Arc<dyn LlmProvider>,
    config: QuestionGeneratorConfig,
}

impl ReportService {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self::with_config(provider, QuestionGeneratorConfig::default())
    }

    pub fn with_config(provider: Arc<dyn LlmProvider>, config: QuestionGeneratorConfig) -> Self {
        Self { provider, config }
    }

    pub async fn generate(&self, assessment: &serde_json::Value) -> Result<AssessmentReport, DomainError> {
        if assessment.is_null() {
            return Err(DomainError::validation("Assessment responses are required"));
        }

        let prompt = format!(
            "Assessment responses:\n{}",
            serde_json::to_string_pretty(assessment).unwrap_or_default()
        );

        let request = LlmRequest::builder()
            .system(SYSTEM_PROMPT)
            .user(prompt)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .json_object()
            .build();

        let response = self.provider.chat(&self.config.model, request).await?;
        if response.is_truncated() {
            warn!(model = %self.config.model, "Report generation hit the token limit");
        }

        let report: AssessmentReport = serde_json::from_str(response.content()).map_err(|e| {
            DomainError::provider(
                self.provider.provider_name(),
                format!("Model returned an unreadable report: {}", e),
            )
        })?;

        info!(
            model = %self.config.model,
            careers = report.primary_career_paths.careers.len(),
            "Generated assessment report"
        );

        Ok(report)
    }
}
