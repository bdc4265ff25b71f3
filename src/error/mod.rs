//! Error handling for majorquiz.
//!
//! This module provides:
//! - [`QuizError`]: The main error enum for all quiz operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Serializable error with suggestion and context

mod codes;

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::ids::QuestionId;

pub use codes::ErrorCode;

/// The kind of entity an identifier refers to, used in lookup and
/// duplicate errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Question,
    Answer,
    Course,
    Response,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Question => "Question",
            Self::Answer => "Answer",
            Self::Course => "Course",
            Self::Response => "Response",
        };
        f.write_str(name)
    }
}

/// Main error type for majorquiz operations.
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration {version} failed: {reason}")]
    Migration { version: u32, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    #[error("Dimension mismatch for {subject}: expected {expected}, got {got}")]
    DimensionMismatch {
        subject: String,
        expected: usize,
        got: usize,
    },

    #[error("Incomplete response, unanswered questions: {}", join_ids(.missing))]
    IncompleteResponse { missing: Vec<QuestionId> },

    #[error("Invalid encoding for {subject}: {reason}")]
    InvalidEncoding { subject: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{kind} already exists: {key}")]
    Duplicate { kind: EntityKind, key: String },

    #[error("Model layers have not been configured")]
    ModelNotConfigured,

    #[error("Training failed: {0}")]
    Training(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),
}

fn join_ids(ids: &[QuestionId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl QuizError {
    pub fn not_found(kind: EntityKind, key: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn duplicate(kind: EntityKind, key: impl fmt::Display) -> Self {
        Self::Duplicate {
            kind,
            key: key.to_string(),
        }
    }

    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Database(_) | Self::Migration { .. } => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::SerializationError,
            Self::NotFound { kind, .. } => match kind {
                EntityKind::Question => ErrorCode::QuestionNotFound,
                EntityKind::Answer => ErrorCode::AnswerNotFound,
                EntityKind::Course => ErrorCode::CourseNotFound,
                EntityKind::Response => ErrorCode::ResponseNotFound,
            },
            Self::DimensionMismatch { .. } => ErrorCode::DimensionMismatch,
            Self::IncompleteResponse { .. } => ErrorCode::IncompleteResponse,
            Self::InvalidEncoding { .. } => ErrorCode::InvalidEncoding,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Duplicate { .. } => ErrorCode::DuplicateEntity,
            Self::ModelNotConfigured => ErrorCode::ModelNotConfigured,
            Self::Training(_) => ErrorCode::TrainingFailed,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::NotFound { kind, key } | Self::Duplicate { kind, key } => {
                Some(serde_json::json!({ "kind": kind, "key": key }))
            }
            Self::DimensionMismatch {
                subject,
                expected,
                got,
            } => Some(serde_json::json!({
                "subject": subject,
                "expected": expected,
                "got": got,
            })),
            Self::IncompleteResponse { missing } => {
                let ids: Vec<i64> = missing.iter().map(|qid| qid.get()).collect();
                Some(serde_json::json!({ "missing_question_ids": ids }))
            }
            Self::InvalidEncoding { subject, reason } => {
                Some(serde_json::json!({ "subject": subject, "reason": reason }))
            }
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_quiz_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "COURSE_NOT_FOUND")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 103)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    pub recoverable: bool,

    /// Error category (e.g., "lookup", "validation")
    pub category: String,
}

impl StructuredError {
    #[must_use]
    pub fn from_quiz_error(err: &QuizError) -> Self {
        let code = err.code();
        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion: code.suggestion().to_string(),
            context: err.context(),
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<&QuizError> for StructuredError {
    fn from(err: &QuizError) -> Self {
        Self::from_quiz_error(err)
    }
}

/// Result type alias using QuizError.
pub type Result<T> = std::result::Result<T, QuizError>;
