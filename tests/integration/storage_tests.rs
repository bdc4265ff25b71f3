//! Database persistence across reopen, seeding and write validation.

use majorquiz::Classifier;
use majorquiz::config::ClassifierConfig;
use majorquiz::core::{AnswerId, CourseId, QuestionId};
use majorquiz::error::{ErrorCode, QuizError};
use majorquiz::storage::migrations::SCHEMA_VERSION;
use majorquiz::storage::{DataStore, Database, NewChoice, REFERENCE_COURSES};

use crate::fixture::{QuizFixture, engineer, response};

#[test]
fn data_survives_reopen() {
    let fx = QuizFixture::new();
    let rid = fx.db.store_response(&engineer(), Some(CourseId::new(1))).expect("store");
    let path = fx.db_path.clone();
    let QuizFixture { temp_dir, db, .. } = fx;
    drop(db);

    let reopened = Database::open(&path).expect("reopen");
    assert_eq!(reopened.schema_version(), SCHEMA_VERSION);
    assert_eq!(reopened.question_count().expect("count"), 3);
    assert_eq!(reopened.course_count().expect("count"), 3);
    assert_eq!(
        reopened.load_response(rid).expect("load"),
        Some(engineer())
    );
    drop(temp_dir);
}

#[test]
fn questions_load_in_id_order_with_choices() {
    let fx = QuizFixture::new();
    let questions = fx.db.load_questions().expect("load");

    let ids: Vec<QuestionId> = questions.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![QuestionId::new(1), QuestionId::new(2), QuestionId::new(3)]);

    let weekend = &questions[1];
    assert_eq!(weekend.text, "Pick a weekend");
    let choices: Vec<(AnswerId, &str, &[i64])> = weekend
        .choices
        .iter()
        .map(|c| (c.id, c.text.as_str(), c.encoding.as_slice()))
        .collect();
    assert_eq!(
        choices,
        vec![
            (AnswerId::new(3), "Hackathon", &[1, 0, 0][..]),
            (AnswerId::new(4), "Hiking", &[0, 1, 0][..]),
            (AnswerId::new(5), "Reading", &[0, 0, 1][..]),
        ]
    );
}

#[test]
fn duplicate_question_text_is_rejected_without_writes() {
    let fx = QuizFixture::new();
    let err = fx
        .db
        .store_question(
            "Pick a weekend",
            &[NewChoice::new("Sleeping", vec![1]), NewChoice::new("Gaming", vec![0])],
        )
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::DuplicateEntity);
    assert_eq!(fx.db.question_count().expect("count"), 3);
}

#[test]
fn mismatched_choice_widths_are_rejected() {
    let fx = QuizFixture::new();
    let err = fx
        .db
        .store_question(
            "Favourite season?",
            &[NewChoice::new("Summer", vec![1, 0]), NewChoice::new("Winter", vec![1])],
        )
        .expect_err("widths differ");
    assert!(matches!(err, QuizError::DimensionMismatch { .. }), "{err:?}");
    assert_eq!(fx.db.question_count().expect("count"), 3);
}

#[test]
fn response_with_foreign_answer_is_not_stored() {
    let fx = QuizFixture::new();
    // A6 belongs to Q3, not Q1.
    let err = fx
        .db
        .store_response(&response(&[(1, 6)]), None)
        .expect_err("foreign answer");
    assert_eq!(err.code(), ErrorCode::AnswerNotFound);
    assert_eq!(fx.db.response_count().expect("count"), 0);
}

#[test]
fn unknown_course_label_is_not_stored() {
    let fx = QuizFixture::new();
    let err = fx
        .db
        .store_response(&engineer(), Some(CourseId::new(42)))
        .expect_err("unknown course");
    assert_eq!(err.code(), ErrorCode::CourseNotFound);
    assert_eq!(fx.db.response_count().expect("count"), 0);
}

#[test]
fn unlabelled_responses_stay_out_of_the_corpus() {
    let fx = QuizFixture::new();
    fx.db.store_response(&engineer(), None).expect("unlabelled");
    fx.label(&engineer(), 1, 2);

    assert_eq!(fx.db.response_count().expect("count"), 3);
    assert_eq!(fx.db.labelled_response_count().expect("count"), 2);
    let labelled = fx.db.load_labelled_responses().expect("labelled");
    assert!(labelled.iter().all(|r| r.course == CourseId::new(1)));
    assert!(labelled.windows(2).all(|w| w[0].id < w[1].id));
}

#[test]
fn seeding_reference_courses_is_idempotent() {
    let db = Database::open_in_memory().expect("db");
    let added = db.seed_courses(REFERENCE_COURSES).expect("seed");
    assert_eq!(added, REFERENCE_COURSES.len());
    assert_eq!(db.seed_courses(REFERENCE_COURSES).expect("reseed"), 0);
    assert_eq!(
        db.course_count().expect("count"),
        REFERENCE_COURSES.len() as u64
    );

    let courses = db.load_courses().expect("courses");
    assert_eq!(courses[0].number, REFERENCE_COURSES[0].0);
    assert_eq!(courses[0].name, REFERENCE_COURSES[0].1);
}

#[test]
fn fixture_courses_survive_seeding() {
    let fx = QuizFixture::new();
    let added = fx.db.seed_courses(REFERENCE_COURSES).expect("seed");
    // "6", "7" and "18" are already present with their reference names.
    assert_eq!(added, REFERENCE_COURSES.len() - 3);

    let courses = fx.db.load_courses().expect("courses");
    assert_eq!(courses[0].id, CourseId::new(1));
    assert_eq!(courses[0].number, "6");
}

#[test]
fn clashing_course_is_rejected_and_classifier_still_builds() {
    let fx = QuizFixture::new();

    let err = fx
        .db
        .insert_course("6", "Computer Science and Molecular Biology")
        .expect_err("number 6 is taken");
    assert_eq!(err.code(), ErrorCode::DuplicateEntity);
    let err = fx
        .db
        .insert_course("6-7", "Biology")
        .expect_err("Biology is taken");
    assert_eq!(err.code(), ErrorCode::DuplicateEntity);
    assert_eq!(fx.db.course_count().expect("count"), 3);

    let classifier = Classifier::new(&fx.db, &ClassifierConfig::default()).expect("classifier");
    assert_eq!(classifier.courses().len(), 3);
}
