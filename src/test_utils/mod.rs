//! Shared test utilities for majorquiz.

pub mod fixtures;

pub use fixtures::{
    course_record, question_record, scenario_courses, scenario_database, scenario_questions,
    scenario_response,
};
