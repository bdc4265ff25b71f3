//! The data-store seam consumed by the catalogs and the classifier.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::ids::{AnswerId, CourseId, QuestionId, ResponseId};
use crate::error::{EntityKind, QuizError, Result};

/// A respondent's chosen answer per question.
pub type ResponseMap = BTreeMap<QuestionId, AnswerId>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceRecord {
    pub id: AnswerId,
    pub text: String,
    pub encoding: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub text: String,
    pub choices: Vec<ChoiceRecord>,
}

/// An answer choice that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChoice {
    pub text: String,
    pub encoding: Vec<i64>,
}

impl NewChoice {
    pub fn new(text: impl Into<String>, encoding: Vec<i64>) -> Self {
        Self {
            text: text.into(),
            encoding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseRecord {
    pub id: CourseId,
    pub number: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelledResponse {
    pub id: ResponseId,
    pub course: CourseId,
    pub answers: ResponseMap,
}

/// Persistence operations the pipeline needs.
///
/// Implementations must make `store_response` and `store_question` atomic:
/// a failed call leaves no rows behind.
pub trait DataStore {
    /// All questions with their answer choices, ordered by question id.
    fn load_questions(&self) -> Result<Vec<QuestionRecord>>;

    /// All courses, ordered by course id.
    fn load_courses(&self) -> Result<Vec<CourseRecord>>;

    /// The stored answers of one response, or `None` if it does not exist.
    fn load_response(&self, id: ResponseId) -> Result<Option<ResponseMap>>;

    /// Every response with a course label, ordered by response id.
    fn load_labelled_responses(&self) -> Result<Vec<LabelledResponse>>;

    /// Persist a response and return its generated id.
    fn store_response(&self, answers: &ResponseMap, course: Option<CourseId>) -> Result<ResponseId>;

    /// Persist a new question with its choices. Fails if the text exists.
    fn store_question(&self, text: &str, choices: &[NewChoice]) -> Result<QuestionRecord>;
}

impl<T: DataStore + ?Sized> DataStore for &T {
    fn load_questions(&self) -> Result<Vec<QuestionRecord>> {
        (**self).load_questions()
    }

    fn load_courses(&self) -> Result<Vec<CourseRecord>> {
        (**self).load_courses()
    }

    fn load_response(&self, id: ResponseId) -> Result<Option<ResponseMap>> {
        (**self).load_response(id)
    }

    fn load_labelled_responses(&self) -> Result<Vec<LabelledResponse>> {
        (**self).load_labelled_responses()
    }

    fn store_response(&self, answers: &ResponseMap, course: Option<CourseId>) -> Result<ResponseId> {
        (**self).store_response(answers, course)
    }

    fn store_question(&self, text: &str, choices: &[NewChoice]) -> Result<QuestionRecord> {
        (**self).store_question(text, choices)
    }
}

/// Checks shared by every store before a question is inserted.
pub fn validate_new_question(text: &str, choices: &[NewChoice]) -> Result<()> {
    if text.trim().is_empty() {
        return Err(QuizError::Validation("question text is empty".to_string()));
    }
    if choices.len() < 2 {
        return Err(QuizError::Validation(format!(
            "question {text:?} needs at least 2 answer choices, got {}",
            choices.len()
        )));
    }
    let dimension = choices[0].encoding.len();
    if dimension == 0 {
        return Err(QuizError::InvalidEncoding {
            subject: format!("choice {:?}", choices[0].text),
            reason: "encoding is empty".to_string(),
        });
    }
    let mut seen = std::collections::HashSet::new();
    for choice in choices {
        if choice.encoding.len() != dimension {
            return Err(QuizError::DimensionMismatch {
                subject: format!("question {text:?}"),
                expected: dimension,
                got: choice.encoding.len(),
            });
        }
        if !seen.insert(choice.text.as_str()) {
            return Err(QuizError::duplicate(
                EntityKind::Answer,
                format!("{:?} in question {text:?}", choice.text),
            ));
        }
    }
    Ok(())
}

/// Parse a stored `"1,0,0"` encoding.
pub fn parse_encoding(raw: &str, subject: impl std::fmt::Display) -> Result<Vec<i64>> {
    raw.split(',')
        .map(|part| {
            part.trim().parse::<i64>().map_err(|err| QuizError::InvalidEncoding {
                subject: subject.to_string(),
                reason: format!("{raw:?}: {err}"),
            })
        })
        .collect()
}

#[must_use]
pub fn format_encoding(encoding: &[i64]) -> String {
    encoding
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
