use std::path::PathBuf;

use majorquiz::core::{AnswerId, CourseId, QuestionId};
use majorquiz::storage::{DataStore, Database, NewChoice, ResponseMap};
use tempfile::TempDir;

// =============================================================================
// On-disk quiz fixture
// =============================================================================

/// A file-backed database with three questions and three courses.
///
/// | question | choices                                  |
/// |----------|------------------------------------------|
/// | Q1       | A1 `[1,0]`, A2 `[0,1]`                   |
/// | Q2       | A3 `[1,0,0]`, A4 `[0,1,0]`, A5 `[0,0,1]` |
/// | Q3       | A6 `[1]`, A7 `[0]`                       |
pub struct QuizFixture {
    pub temp_dir: TempDir,
    pub db_path: PathBuf,
    pub db: Database,
}

impl QuizFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("data").join("quiz.db");
        let db = Database::open(&db_path).expect("Failed to open database");

        db.store_question(
            "Which lab sounds most fun?",
            &[NewChoice::new("Robotics", vec![1, 0]), NewChoice::new("Wet lab", vec![0, 1])],
        )
        .expect("store Q1");
        db.store_question(
            "Pick a weekend",
            &[
                NewChoice::new("Hackathon", vec![1, 0, 0]),
                NewChoice::new("Hiking", vec![0, 1, 0]),
                NewChoice::new("Reading", vec![0, 0, 1]),
            ],
        )
        .expect("store Q2");
        db.store_question(
            "Do you like proofs?",
            &[NewChoice::new("Yes", vec![1]), NewChoice::new("No", vec![0])],
        )
        .expect("store Q3");

        db.insert_course("6", "Electrical Engineering and Computer Science")
            .expect("course 6");
        db.insert_course("7", "Biology").expect("course 7");
        db.insert_course("18", "Mathematics").expect("course 18");

        Self {
            temp_dir,
            db_path,
            db,
        }
    }

    /// Store `count` copies of a labelled response.
    pub fn label(&self, answers: &ResponseMap, course: i64, count: usize) {
        for _ in 0..count {
            self.db
                .store_response(answers, Some(CourseId::new(course)))
                .expect("store labelled response");
        }
    }
}

/// Response map from `(qid, aid)` pairs.
pub fn response(pairs: &[(i64, i64)]) -> ResponseMap {
    pairs
        .iter()
        .map(|&(q, a)| (QuestionId::new(q), AnswerId::new(a)))
        .collect()
}

pub fn engineer() -> ResponseMap {
    response(&[(1, 1), (2, 3), (3, 7)])
}

pub fn biologist() -> ResponseMap {
    response(&[(1, 2), (2, 4), (3, 7)])
}

pub fn mathematician() -> ResponseMap {
    response(&[(1, 1), (2, 5), (3, 6)])
}
