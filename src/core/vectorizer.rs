//! Working response state on top of the question catalog.

use std::sync::Arc;

use crate::core::catalog::QuestionCatalog;
use crate::core::ids::{AnswerRef, QuestionId, QuestionRef};
use crate::error::{QuizError, Result};
use crate::storage::ResponseMap;

/// Accumulates one respondent's answers and turns them into a feature vector.
///
/// The catalog is shared and never mutated; only the working answers change.
#[derive(Debug, Clone)]
pub struct ResponseVectorizer {
    catalog: Arc<QuestionCatalog>,
    answers: ResponseMap,
}

impl ResponseVectorizer {
    #[must_use]
    pub const fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            catalog,
            answers: ResponseMap::new(),
        }
    }

    /// Record `answer` for `question`, replacing any earlier choice.
    ///
    /// Both aliases must resolve, and the answer must belong to the question.
    pub fn set_answer(
        &mut self,
        question: impl Into<QuestionRef>,
        answer: impl Into<AnswerRef>,
    ) -> Result<()> {
        let (qid, aid) = self.catalog.resolve(&question.into(), &answer.into())?;
        self.answers.insert(qid, aid);
        Ok(())
    }

    /// Catalog questions without a recorded answer, in layout order.
    #[must_use]
    pub fn missing(&self) -> Vec<QuestionId> {
        self.catalog
            .question_ids()
            .filter(|qid| !self.answers.contains_key(qid))
            .collect()
    }

    /// Fail unless every catalog question has an answer.
    pub fn assert_complete(&self) -> Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(QuizError::IncompleteResponse { missing })
        }
    }

    #[must_use]
    pub fn to_vector(&self) -> Vec<f64> {
        self.catalog.vectorize(&self.answers)
    }

    pub fn reset(&mut self) {
        self.answers.clear();
    }

    #[must_use]
    pub const fn answers(&self) -> &ResponseMap {
        &self.answers
    }

    #[must_use]
    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }
}
