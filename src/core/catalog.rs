//! Question-answer catalog.
//!
//! Single source of truth for the feature-vector layout: which questions
//! exist, the order they appear in, the slot (offset, dimension) each one
//! occupies, and the encoding written into that slot for every answer choice.
//!
//! The layout is fixed when the catalog is built. Questions are ordered by
//! ascending [`QuestionId`] and offsets are the running sum of dimensions over
//! that order, so a stored vector or trained model is only valid against a
//! catalog built from the same question set.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::ids::{AnswerId, AnswerRef, QuestionId, QuestionRef};
use crate::core::resolver::Resolver;
use crate::error::{EntityKind, QuizError, Result};
use crate::storage::{DataStore, QuestionRecord, ResponseMap};

#[derive(Debug, Clone)]
struct QuestionEntry {
    text: String,
    dimension: usize,
    offset: usize,
    choices: Vec<(AnswerId, String)>,
    answers: Resolver<AnswerRef, AnswerId>,
    encodings: HashMap<AnswerId, Vec<f64>>,
}

/// Display view of one question's place in the layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSummary {
    pub id: QuestionId,
    pub text: String,
    pub offset: usize,
    pub dimension: usize,
    pub choices: Vec<ChoiceSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceSummary {
    pub id: AnswerId,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: BTreeMap<QuestionId, QuestionEntry>,
    resolver: Resolver<QuestionRef, QuestionId>,
    answer_owner: HashMap<AnswerId, QuestionId>,
    input_dimension: usize,
}

#[allow(clippy::cast_precision_loss)]
fn to_feature(encoding: &[i64]) -> Vec<f64> {
    encoding.iter().map(|&v| v as f64).collect()
}

impl QuestionCatalog {
    /// Load every question from the store and build the catalog.
    pub fn load(store: &impl DataStore) -> Result<Self> {
        Self::build(store.load_questions()?)
    }

    /// Build the catalog from question records in any order.
    ///
    /// Fails if a question has no choices, if any encoding is empty, or if
    /// the choices of one question disagree on the encoding length.
    pub fn build(records: Vec<QuestionRecord>) -> Result<Self> {
        let mut questions = BTreeMap::new();
        let mut resolver = Resolver::new(EntityKind::Question);
        let mut answer_owner = HashMap::new();

        for record in records {
            let qid = record.id;
            if questions.contains_key(&qid) {
                return Err(QuizError::duplicate(EntityKind::Question, qid));
            }
            let Some(first) = record.choices.first() else {
                return Err(QuizError::Validation(format!(
                    "{qid} ({:?}) has no answer choices",
                    record.text
                )));
            };
            let dimension = first.encoding.len();
            if dimension == 0 {
                return Err(QuizError::InvalidEncoding {
                    subject: format!("{qid} (choice {})", first.id),
                    reason: "encoding is empty".to_string(),
                });
            }

            let mut answers = Resolver::new(EntityKind::Answer);
            let mut encodings = HashMap::with_capacity(record.choices.len());
            let mut choices = Vec::with_capacity(record.choices.len());
            for choice in record.choices {
                if choice.encoding.len() != dimension {
                    return Err(QuizError::DimensionMismatch {
                        subject: format!("{qid} (choice {})", choice.id),
                        expected: dimension,
                        got: choice.encoding.len(),
                    });
                }
                if answer_owner.insert(choice.id, qid).is_some() {
                    return Err(QuizError::duplicate(EntityKind::Answer, choice.id));
                }
                answers.bind(
                    [AnswerRef::Id(choice.id), AnswerRef::Text(choice.text.clone())],
                    choice.id,
                )?;
                encodings.insert(choice.id, to_feature(&choice.encoding));
                choices.push((choice.id, choice.text));
            }

            resolver.bind(
                [QuestionRef::Id(qid), QuestionRef::Text(record.text.clone())],
                qid,
            )?;
            questions.insert(
                qid,
                QuestionEntry {
                    text: record.text,
                    dimension,
                    offset: 0,
                    choices,
                    answers,
                    encodings,
                },
            );
        }

        // BTreeMap iteration is ascending by id, which is the layout order.
        let mut offset = 0;
        for entry in questions.values_mut() {
            entry.offset = offset;
            offset += entry.dimension;
        }

        debug!(
            questions = questions.len(),
            input_dimension = offset,
            "built question catalog"
        );

        Ok(Self {
            questions,
            resolver,
            answer_owner,
            input_dimension: offset,
        })
    }

    fn entry(&self, qid: QuestionId) -> Result<&QuestionEntry> {
        self.questions
            .get(&qid)
            .ok_or_else(|| QuizError::not_found(EntityKind::Question, qid))
    }

    /// Resolve a question alias to its id.
    pub fn question_id(&self, question: &QuestionRef) -> Result<QuestionId> {
        self.resolver.resolve(question)
    }

    /// Resolve an answer alias, scoped to the given question.
    pub fn answer_id(&self, question: &QuestionRef, answer: &AnswerRef) -> Result<AnswerId> {
        let qid = self.question_id(question)?;
        self.entry(qid)?.answers.resolve(answer)
    }

    /// Both canonical ids for a (question, answer) alias pair.
    pub fn resolve(&self, question: &QuestionRef, answer: &AnswerRef) -> Result<(QuestionId, AnswerId)> {
        let qid = self.question_id(question)?;
        let aid = self.entry(qid)?.answers.resolve(answer)?;
        Ok((qid, aid))
    }

    /// Encoding written into the question's slot when `answer` is chosen.
    pub fn answer_vector(&self, question: &QuestionRef, answer: &AnswerRef) -> Result<&[f64]> {
        let (qid, aid) = self.resolve(question, answer)?;
        self.encoding(qid, aid)
    }

    /// Encoding of an answer looked up by its id alone.
    pub fn answer_vector_by_id(&self, aid: AnswerId) -> Result<&[f64]> {
        let qid = self.question_of(aid)?;
        self.encoding(qid, aid)
    }

    /// The question an answer id belongs to.
    pub fn question_of(&self, aid: AnswerId) -> Result<QuestionId> {
        self.answer_owner
            .get(&aid)
            .copied()
            .ok_or_else(|| QuizError::not_found(EntityKind::Answer, aid))
    }

    fn encoding(&self, qid: QuestionId, aid: AnswerId) -> Result<&[f64]> {
        self.entry(qid)?
            .encodings
            .get(&aid)
            .map(Vec::as_slice)
            .ok_or_else(|| QuizError::not_found(EntityKind::Answer, format!("{aid} under {qid}")))
    }

    /// Width of the question's slot.
    pub fn dimension(&self, question: &QuestionRef) -> Result<usize> {
        Ok(self.entry(self.question_id(question)?)?.dimension)
    }

    /// Start of the question's slot in the feature vector.
    pub fn offset(&self, question: &QuestionRef) -> Result<usize> {
        Ok(self.entry(self.question_id(question)?)?.offset)
    }

    /// Question ids in layout order.
    pub fn question_ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.questions.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub const fn input_dimension(&self) -> usize {
        self.input_dimension
    }

    #[must_use]
    pub fn contains(&self, qid: QuestionId) -> bool {
        self.questions.contains_key(&qid)
    }

    /// Build the feature vector for a possibly partial response.
    ///
    /// Unanswered questions keep a zero-filled slot. Question ids the catalog
    /// does not know are ignored, and an answer that does not belong to its
    /// question leaves the slot zero-filled. This never fails.
    #[must_use]
    pub fn vectorize(&self, responses: &ResponseMap) -> Vec<f64> {
        let mut vector = vec![0.0; self.input_dimension];
        for (qid, aid) in responses {
            let Some(entry) = self.questions.get(qid) else {
                debug!(question = %qid, "ignoring answer to unknown question");
                continue;
            };
            match entry.encodings.get(aid) {
                Some(encoding) => {
                    vector[entry.offset..entry.offset + entry.dimension].copy_from_slice(encoding);
                }
                None => warn!(question = %qid, answer = %aid, "answer not in question, leaving slot empty"),
            }
        }
        vector
    }

    /// Questions in layout order, for display.
    #[must_use]
    pub fn questions(&self) -> Vec<QuestionSummary> {
        self.questions
            .iter()
            .map(|(qid, entry)| QuestionSummary {
                id: *qid,
                text: entry.text.clone(),
                offset: entry.offset,
                dimension: entry.dimension,
                choices: entry
                    .choices
                    .iter()
                    .map(|(id, text)| ChoiceSummary {
                        id: *id,
                        text: text.clone(),
                    })
                    .collect(),
            })
            .collect()
    }
}
