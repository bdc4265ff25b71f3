//! Storage layer for majorquiz
//!
//! The pipeline talks to persistence only through the [`DataStore`] trait;
//! [`Database`] is the SQLite implementation.

pub mod migrations;
pub mod reference;
pub mod sqlite;
pub mod store;

pub use reference::REFERENCE_COURSES;
pub use sqlite::Database;
pub use store::{
    ChoiceRecord, CourseRecord, DataStore, LabelledResponse, NewChoice, QuestionRecord,
    ResponseMap,
};
