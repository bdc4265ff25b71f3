//! Small quiz fixtures.
//!
//! The "scenario" quiz has two questions and two courses:
//!
//! | question | choices (id, text, encoding)                 |
//! |----------|----------------------------------------------|
//! | Q1       | A1 "A" `[1,0]`, A2 "C" `[0,1]`               |
//! | Q2       | A3 "D" `[1,0,0]`, A4 "B" `[0,1,0]`, A5 "E" `[0,0,1]` |
//!
//! Courses are C1 (`"6"`, EECS) and C2 (`"8"`, Physics). Loaded into a fresh
//! database the store assigns exactly these ids.

use crate::core::ids::{AnswerId, CourseId, QuestionId};
use crate::error::Result;
use crate::storage::{
    ChoiceRecord, CourseRecord, DataStore, Database, NewChoice, QuestionRecord, ResponseMap,
};

pub fn question_record(id: i64, text: &str, choices: &[(i64, &str, &[i64])]) -> QuestionRecord {
    QuestionRecord {
        id: QuestionId::new(id),
        text: text.to_string(),
        choices: choices
            .iter()
            .map(|(aid, choice, encoding)| ChoiceRecord {
                id: AnswerId::new(*aid),
                text: (*choice).to_string(),
                encoding: encoding.to_vec(),
            })
            .collect(),
    }
}

pub fn course_record(id: i64, number: &str, name: &str) -> CourseRecord {
    CourseRecord {
        id: CourseId::new(id),
        number: number.to_string(),
        name: name.to_string(),
    }
}

pub fn scenario_questions() -> Vec<QuestionRecord> {
    vec![
        question_record(1, "Favourite lab?", &[(1, "A", &[1, 0]), (2, "C", &[0, 1])]),
        question_record(
            2,
            "Weekend plans?",
            &[(3, "D", &[1, 0, 0]), (4, "B", &[0, 1, 0]), (5, "E", &[0, 0, 1])],
        ),
    ]
}

pub fn scenario_courses() -> Vec<CourseRecord> {
    vec![
        course_record(1, "6", "Electrical Engineering and Computer Science"),
        course_record(2, "8", "Physics"),
    ]
}

/// Q1 -> `first`, Q2 -> `second`.
pub fn scenario_response(first: i64, second: i64) -> ResponseMap {
    ResponseMap::from([
        (QuestionId::new(1), AnswerId::new(first)),
        (QuestionId::new(2), AnswerId::new(second)),
    ])
}

/// An in-memory database holding the scenario questions and courses.
pub fn scenario_database() -> Result<Database> {
    let db = Database::open_in_memory()?;
    for question in scenario_questions() {
        let choices: Vec<NewChoice> = question
            .choices
            .into_iter()
            .map(|choice| NewChoice::new(choice.text, choice.encoding))
            .collect();
        db.store_question(&question.text, &choices)?;
    }
    for course in scenario_courses() {
        db.insert_course(&course.number, &course.name)?;
    }
    Ok(db)
}
