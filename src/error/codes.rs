//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Lookup errors (an identifier has no canonical mapping)
//! - 2xx: Validation errors (dimensions, completeness, duplicates)
//! - 3xx: Config errors
//! - 6xx: Storage errors
//! - 7xx: Model errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for `--json` output.
///
/// Each variant maps to a numeric code (e.g., `QuestionNotFound` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Lookup errors (1xx)
    // ========================================
    /// E101: No question matches the given id or text
    QuestionNotFound,
    /// E102: No answer choice matches the given id or text
    AnswerNotFound,
    /// E103: No course matches the given id, number, or name
    CourseNotFound,
    /// E104: No stored response has the given id
    ResponseNotFound,

    // ========================================
    // Validation errors (2xx)
    // ========================================
    /// E201: Encoding length disagrees with the question's dimension
    DimensionMismatch,
    /// E202: Response leaves catalog questions unanswered
    IncompleteResponse,
    /// E203: Stored encoding vector is not a list of integers
    InvalidEncoding,
    /// E204: Generic validation failure
    ValidationFailed,
    /// E205: Entity already exists
    DuplicateEntity,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E301: Config file has invalid syntax or values
    ConfigInvalid,
    /// E302: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    DatabaseError,
    SerializationError,
    IoError,

    // ========================================
    // Model errors (7xx)
    // ========================================
    /// E701: Model used before its layers were configured
    ModelNotConfigured,
    /// E702: Fitting the model failed
    TrainingFailed,
}

impl ErrorCode {
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::QuestionNotFound => 101,
            Self::AnswerNotFound => 102,
            Self::CourseNotFound => 103,
            Self::ResponseNotFound => 104,

            Self::DimensionMismatch => 201,
            Self::IncompleteResponse => 202,
            Self::InvalidEncoding => 203,
            Self::ValidationFailed => 204,
            Self::DuplicateEntity => 205,

            Self::ConfigInvalid => 301,
            Self::ConfigMissingRequired => 302,

            Self::DatabaseError => 601,
            Self::SerializationError => 602,
            Self::IoError => 603,

            Self::ModelNotConfigured => 701,
            Self::TrainingFailed => 702,
        }
    }

    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::QuestionNotFound => "Run `mq questions` to list question ids and texts",
            Self::AnswerNotFound => "Run `mq questions` to list the answer choices of each question",
            Self::CourseNotFound => "Run `mq courses` to list course ids, numbers, and names",
            Self::ResponseNotFound => "Check the response id; responses are created with `mq submit`",
            Self::DimensionMismatch => "Every answer choice of a question must use an encoding of the same length",
            Self::IncompleteResponse => "Answer every listed question before storing the response",
            Self::InvalidEncoding => "Encodings are comma-separated integers, e.g. `1,0,0`",
            Self::ValidationFailed => "Check the input values and try again",
            Self::DuplicateEntity => "Reuse the existing entity instead of creating a new one",
            Self::ConfigInvalid => "Fix the config file or the MQ_* environment variable named in the message",
            Self::ConfigMissingRequired => "Set the missing value in config.toml or pass it on the command line",
            Self::DatabaseError => "Check that the database file is readable and not locked by another process",
            Self::SerializationError => "The data could not be encoded or decoded; re-run with -vv for details",
            Self::IoError => "Check file permissions and available disk space",
            Self::ModelNotConfigured => "Configure the classifier layers before training or predicting",
            Self::TrainingFailed => "Check that the corpus has consistent shapes and retry",
        }
    }

    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self.numeric() / 100,
            1 | 2 | 3
        )
    }

    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "lookup",
            2 => "validation",
            3 => "config",
            6 => "storage",
            7 => "model",
            _ => "unknown",
        }
    }

    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::QuestionNotFound,
            Self::AnswerNotFound,
            Self::CourseNotFound,
            Self::ResponseNotFound,
            Self::DimensionMismatch,
            Self::IncompleteResponse,
            Self::InvalidEncoding,
            Self::ValidationFailed,
            Self::DuplicateEntity,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::DatabaseError,
            Self::SerializationError,
            Self::IoError,
            Self::ModelNotConfigured,
            Self::TrainingFailed,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
