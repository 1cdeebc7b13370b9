//! Follow-up question entities

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Question identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier (`q-<uuid>`)
    pub fn generate() -> Self {
        Self(format!("q-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A follow-up question with its ordered answer options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
}

impl Question {
    pub fn new(id: impl Into<QuestionId>, text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            options,
        }
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }
}

/// What a piece of text is within a question set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    Question,
    Option,
}

/// A text that needs an embedding
///
/// Identity is `(role, parent question, text)`: the same option text under two
/// different questions is two items, the same text twice under one question
/// is one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextItem {
    text: String,
    role: TextRole,
    parent_question_id: Option<QuestionId>,
}

impl TextItem {
    pub fn question(text: impl Into<String>) -> Self {
        let text = text.into();

        Self {
            text,
            role: TextRole::Question,
            parent_question_id: None,
        }
    }

    pub fn option(parent: &QuestionId, text: impl Into<String>) -> Self {
        let text = text.into();

        Self {
            text,
            role: TextRole::Option,
            parent_question_id: Some(parent.clone()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn role(&self) -> TextRole {
        self.role
    }

    pub fn parent_question_id(&self) -> Option<&QuestionId> {
        self.parent_question_id.as_ref()
    }
}
