//! Near-duplicate detection over a follow-up question set

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::embedding::cosine_similarity;
use crate::domain::question::{
    Question, SimilarityPair, TextItem, OPTION_SIMILARITY_THRESHOLD,
    QUESTION_SIMILARITY_THRESHOLD,
};
use crate::domain::DomainError;

use super::embedding_fetcher::BatchEmbeddingFetcher;

/// Flags question pairs and option pairs whose embeddings are too close
#[derive(Debug)]
pub struct SimilarityDetector {
    fetcher: Arc<BatchEmbeddingFetcher>,
}

impl SimilarityDetector {
    pub fn new(fetcher: Arc<BatchEmbeddingFetcher>) -> Self {
        Self { fetcher }
    }

    /// Near-duplicate pairs in `questions`
    ///
    /// Question pairs come first in (i, j) order, then option pairs of each
    /// question in input order. Options are only compared within their own
    /// question.
    pub async fn detect(&self, questions: &[Question]) -> Result<Vec<SimilarityPair>, DomainError> {
        validate(questions)?;

        if questions.is_empty() {
            return Ok(Vec::new());
        }

        let items = collect_items(questions);
        let texts: Vec<String> = items.iter().map(|item| item.text().to_string()).collect();
        let vectors = self.fetcher.fetch_embeddings(&texts).await?;

        let by_item: HashMap<TextItem, Vec<f32>> = items.into_iter().zip(vectors).collect();

        let mut pairs = Vec::new();

        let question_vectors = questions
            .iter()
            .map(|q| lookup(&by_item, &TextItem::question(q.text())))
            .collect::<Result<Vec<_>, _>>()?;

        for i in 0..questions.len() {
            for j in (i + 1)..questions.len() {
                let score = cosine_similarity(question_vectors[i], question_vectors[j]);
                if score > QUESTION_SIMILARITY_THRESHOLD {
                    pairs.push(SimilarityPair::questions(
                        questions[i].text(),
                        questions[j].text(),
                        score,
                    ));
                }
            }
        }

        for question in questions {
            let options = question.options();
            let option_vectors = options
                .iter()
                .map(|option| lookup(&by_item, &TextItem::option(question.id(), option.as_str())))
                .collect::<Result<Vec<_>, _>>()?;

            for i in 0..options.len() {
                for j in (i + 1)..options.len() {
                    let score = cosine_similarity(option_vectors[i], option_vectors[j]);
                    if score > OPTION_SIMILARITY_THRESHOLD {
                        pairs.push(SimilarityPair::options(
                            question.id().clone(),
                            options[i].as_str(),
                            options[j].as_str(),
                            score,
                        ));
                    }
                }
            }
        }

        if pairs.is_empty() {
            debug!(questions = questions.len(), "No near-duplicates found");
        } else {
            info!(
                questions = questions.len(),
                pairs = pairs.len(),
                "Near-duplicate questions or options found"
            );
        }

        Ok(pairs)
    }
}

fn validate(questions: &[Question]) -> Result<(), DomainError> {
    let mut ids = HashSet::with_capacity(questions.len());

    for (position, question) in questions.iter().enumerate() {
        if question.text().trim().is_empty() {
            return Err(DomainError::validation(format!(
                "Question {} ('{}') has no text",
                position,
                question.id()
            )));
        }

        if question.options().is_empty() {
            return Err(DomainError::validation(format!(
                "Question '{}' has no options",
                question.id()
            )));
        }

        if question.options().iter().any(|o| o.trim().is_empty()) {
            return Err(DomainError::validation(format!(
                "Question '{}' has a blank option",
                question.id()
            )));
        }

        if !ids.insert(question.id()) {
            return Err(DomainError::validation(format!(
                "Duplicate question id '{}'",
                question.id()
            )));
        }
    }

    Ok(())
}

/// Every question and option as a text item, deduplicated by identity
fn collect_items(questions: &[Question]) -> Vec<TextItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for question in questions {
        let candidates = std::iter::once(TextItem::question(question.text())).chain(
            question
                .options()
                .iter()
                .map(|option| TextItem::option(question.id(), option.as_str())),
        );

        for item in candidates {
            if seen.insert(item.clone()) {
                items.push(item);
            }
        }
    }

    items
}

fn lookup<'a>(vectors: &'a HashMap<TextItem, Vec<f32>>, item: &TextItem) -> Result<&'a [f32], DomainError> {
    vectors
        .get(item)
        .map(Vec::as_slice)
        .ok_or_else(|| DomainError::internal(format!("No embedding for '{}'", item.text())))
}
