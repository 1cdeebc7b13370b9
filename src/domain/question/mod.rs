//! Follow-up question domain - questions, near-duplicate reports and the generator contract

mod entity;
mod generator;
mod similarity;

pub use entity::{Question, QuestionId, TextItem, TextRole};
pub use generator::{
    GenerationContext, GenerationOutcome, GenerationState, QuestionGenerator,
    RegenerationFeedback,
};
pub use similarity::{
    SimilarityKind, SimilarityPair, OPTION_SIMILARITY_THRESHOLD, QUESTION_SIMILARITY_THRESHOLD,
};

#[cfg(test)]
pub use generator::MockQuestionGenerator;
