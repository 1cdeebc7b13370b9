//! Question generator contract and the regeneration state machine types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Question, SimilarityPair};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Input the generator works from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationContext {
    /// Raw assessment responses collected so far
    pub assessment: serde_json::Value,
    /// How many follow-up questions to ask for
    pub question_count: usize,
}

impl GenerationContext {
    pub fn new(assessment: serde_json::Value, question_count: usize) -> Self {
        Self {
            assessment,
            question_count,
        }
    }
}

/// Corrective feedback for the single regeneration attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegenerationFeedback {
    /// The candidate set that was rejected
    pub rejected: Vec<Question>,
    /// Offending pairs found in the rejected set
    pub pairs: Vec<SimilarityPair>,
}

impl RegenerationFeedback {
    pub fn new(rejected: Vec<Question>, pairs: Vec<SimilarityPair>) -> Self {
        Self { rejected, pairs }
    }

    /// Numbered list of the offending pairs
    pub fn enumerate_pairs(&self) -> String {
        self.pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| format!("{}. {}", i + 1, pair.describe()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Produces candidate follow-up questions
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Produce an initial candidate set
    async fn generate(&self, context: &GenerationContext) -> Result<Vec<Question>, DomainError>;

    /// Produce a replacement set, steering away from the listed duplicates
    async fn regenerate(
        &self,
        context: &GenerationContext,
        feedback: &RegenerationFeedback,
    ) -> Result<Vec<Question>, DomainError>;
}

/// States of the generate/check/regenerate flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    /// Candidate set produced by the generator
    Generated,
    /// Similarity check has run on the candidate set
    Checked,
    /// Terminal: the question set is accepted
    Final,
}

/// Result of one generate/check/regenerate run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub questions: Vec<Question>,
    /// Pairs found when the first candidate set was checked
    pub duplicates: Vec<SimilarityPair>,
    pub regenerated: bool,
    pub state: GenerationState,
}
