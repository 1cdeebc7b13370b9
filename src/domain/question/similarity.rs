//! Near-duplicate reports

use serde::{Deserialize, Serialize};

use super::QuestionId;

/// Pairs of questions scoring above this are near-duplicates
pub const QUESTION_SIMILARITY_THRESHOLD: f32 = 0.85;

/// Pairs of options within one question scoring above this are near-duplicates
pub const OPTION_SIMILARITY_THRESHOLD: f32 = 0.80;

/// Kind of texts that were compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityKind {
    Questions,
    Options,
}

/// Two texts whose embeddings are too close
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityPair {
    pub kind: SimilarityKind,
    /// Question owning both options; `None` for question pairs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_question_id: Option<QuestionId>,
    pub text_a: String,
    pub text_b: String,
    pub score: f32,
}

impl SimilarityPair {
    pub fn questions(text_a: impl Into<String>, text_b: impl Into<String>, score: f32) -> Self {
        Self {
            kind: SimilarityKind::Questions,
            context_question_id: None,
            text_a: text_a.into(),
            text_b: text_b.into(),
            score,
        }
    }

    pub fn options(
        question_id: QuestionId,
        text_a: impl Into<String>,
        text_b: impl Into<String>,
        score: f32,
    ) -> Self {
        Self {
            kind: SimilarityKind::Options,
            context_question_id: Some(question_id),
            text_a: text_a.into(),
            text_b: text_b.into(),
            score,
        }
    }

    /// One-line human readable description
    pub fn describe(&self) -> String {
        match self.kind {
            SimilarityKind::Questions => format!(
                "Questions \"{}\" and \"{}\" are {:.0}% similar",
                self.text_a,
                self.text_b,
                self.score * 100.0
            ),
            SimilarityKind::Options => format!(
                "Options \"{}\" and \"{}\" of question {} are {:.0}% similar",
                self.text_a,
                self.text_b,
                self.context_question_id
                    .as_ref()
                    .map(QuestionId::as_str)
                    .unwrap_or("?"),
                self.score * 100.0
            ),
        }
    }
}
