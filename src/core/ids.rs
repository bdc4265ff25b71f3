//! Identifier types.
//!
//! Numeric ids are the only storage keys. The `*Ref` enums are the aliases
//! callers may use instead; they are resolved to ids through a
//! [`Resolver`](super::resolver::Resolver) owned by the relevant catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "{}"), self.0)
            }
        }
    };
}

numeric_id!(
    /// Store-generated question id; ascending order defines the feature layout.
    QuestionId,
    "Q"
);
numeric_id!(
    /// Store-generated answer choice id, scoped under one question.
    AnswerId,
    "A"
);
numeric_id!(
    /// Store-generated course id; ascending order defines the label index.
    CourseId,
    "C"
);
numeric_id!(
    /// Store-generated response id.
    ResponseId,
    "R"
);

/// A question addressed by id or by its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuestionRef {
    Id(QuestionId),
    Text(String),
}

impl fmt::Display for QuestionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Text(text) => write!(f, "question {text:?}"),
        }
    }
}

impl From<QuestionId> for QuestionRef {
    fn from(id: QuestionId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for QuestionRef {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for QuestionRef {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// An answer choice addressed by id or by its choice text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnswerRef {
    Id(AnswerId),
    Text(String),
}

impl fmt::Display for AnswerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Text(text) => write!(f, "choice {text:?}"),
        }
    }
}

impl From<AnswerId> for AnswerRef {
    fn from(id: AnswerId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for AnswerRef {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for AnswerRef {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A course addressed by id, human course number (e.g. `"6"`), or name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CourseRef {
    Id(CourseId),
    Number(String),
    Name(String),
}

impl CourseRef {
    pub fn number(number: impl Into<String>) -> Self {
        Self::Number(number.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl fmt::Display for CourseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Number(number) => write!(f, "course number {number:?}"),
            Self::Name(name) => write!(f, "course {name:?}"),
        }
    }
}

impl From<CourseId> for CourseRef {
    fn from(id: CourseId) -> Self {
        Self::Id(id)
    }
}
