//! Error codes and messages surfaced by the classifier API.

use majorquiz::config::ClassifierConfig;
use majorquiz::core::{AnswerId, CourseRef, QuestionId};
use majorquiz::error::{ErrorCode, QuizError};
use majorquiz::model::FitOptions;
use majorquiz::storage::{DataStore, Database};
use majorquiz::Classifier;

use crate::fixture::QuizFixture;

fn classifier(fx: &QuizFixture) -> Classifier<&Database> {
    let config = ClassifierConfig {
        hidden_layers: Vec::new(),
        ..ClassifierConfig::default()
    };
    Classifier::new(&fx.db, &config).expect("classifier")
}

#[test]
fn incomplete_response_names_every_missing_question() {
    let fx = QuizFixture::new();
    let mut classifier = classifier(&fx);

    let err = classifier
        .store_training_example([(QuestionId::new(2), AnswerId::new(4))], None)
        .expect_err("incomplete");
    assert_eq!(err.code(), ErrorCode::IncompleteResponse);
    assert_eq!(
        err.to_string(),
        "Incomplete response, unanswered questions: Q1, Q3"
    );

    let structured = err.to_structured();
    assert_eq!(structured.numeric_code, 202);
    assert_eq!(
        structured.context,
        Some(serde_json::json!({ "missing_question_ids": [1, 3] }))
    );
    assert_eq!(fx.db.response_count().expect("count"), 0);
}

#[test]
fn failed_store_leaves_no_working_answers_behind() {
    let fx = QuizFixture::new();
    let mut classifier = classifier(&fx);

    classifier
        .store_training_example(
            [(QuestionId::new(1), AnswerId::new(1)), (QuestionId::new(2), AnswerId::new(3))],
            None,
        )
        .expect_err("Q3 unanswered");

    // A second, complete call must not inherit the answers above.
    let rid = classifier
        .store_training_example(
            [
                (QuestionId::new(1), AnswerId::new(2)),
                (QuestionId::new(2), AnswerId::new(5)),
                (QuestionId::new(3), AnswerId::new(6)),
            ],
            None,
        )
        .expect("complete");
    let stored = fx.db.load_response(rid).expect("load").expect("present");
    assert_eq!(stored.get(&QuestionId::new(1)), Some(&AnswerId::new(2)));
}

#[test]
fn answer_from_another_question_is_rejected() {
    let fx = QuizFixture::new();
    let classifier = classifier(&fx);

    let err = classifier
        .predict_from_answers([(QuestionId::new(1), AnswerId::new(6))])
        .expect_err("A6 belongs to Q3");
    assert_eq!(err.code(), ErrorCode::AnswerNotFound);
}

#[test]
fn unknown_lookups_map_to_lookup_codes() {
    let fx = QuizFixture::new();
    let mut classifier = classifier(&fx);

    let err = classifier
        .predict_from_answers([("No such question", "Yes")])
        .expect_err("unknown question");
    assert_eq!(err.code(), ErrorCode::QuestionNotFound);

    let err = classifier
        .store_training_example(
            [
                (QuestionId::new(1), AnswerId::new(1)),
                (QuestionId::new(2), AnswerId::new(3)),
                (QuestionId::new(3), AnswerId::new(6)),
            ],
            Some(&CourseRef::number("99")),
        )
        .expect_err("unknown course");
    assert_eq!(err.code(), ErrorCode::CourseNotFound);
    assert_eq!(err.code().category(), "lookup");
    assert_eq!(fx.db.response_count().expect("count"), 0);
}

#[test]
fn wrong_feature_width_is_a_dimension_mismatch() {
    let fx = QuizFixture::new();
    let classifier = classifier(&fx);

    let err = classifier
        .predict_ranking(&[1.0, 0.0])
        .expect_err("too short");
    let QuizError::DimensionMismatch {
        subject,
        expected,
        got,
    } = &err
    else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(subject, "feature vector");
    assert_eq!((*expected, *got), (6, 2));
}

#[test]
fn classifier_needs_questions_and_courses() {
    let db = Database::open_in_memory().expect("db");
    let err = Classifier::new(&db, &ClassifierConfig::default()).expect_err("empty store");
    assert_eq!(err.code(), ErrorCode::ValidationFailed);

    db.insert_course("8", "Physics").expect("course");
    let err = Classifier::new(&db, &ClassifierConfig::default()).expect_err("no questions");
    assert!(err.to_string().contains("questions"), "{err}");
}

#[test]
fn zero_epochs_are_rejected() {
    let fx = QuizFixture::new();
    fx.label(&crate::fixture::engineer(), 1, 1);
    let mut classifier = classifier(&fx);

    let err = classifier
        .train(&FitOptions {
            epochs: 0,
            batch_size: 4,
            verbosity: 0,
        })
        .expect_err("no epochs");
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert!(!classifier.is_trained());
}

#[test]
fn structured_errors_serialize_with_screaming_codes() {
    let err = QuizError::not_found(majorquiz::error::EntityKind::Response, "R7");
    let value = serde_json::to_value(err.to_structured()).expect("serialize");
    assert_eq!(value["code"], "RESPONSE_NOT_FOUND");
    assert_eq!(value["numeric_code"], 104);
    assert_eq!(value["context"]["key"], "R7");
}
