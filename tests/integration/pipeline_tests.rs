//! End-to-end classifier flow against a file-backed database.

use majorquiz::config::ClassifierConfig;
use majorquiz::core::{AnswerId, CourseId, CourseRef, QuestionId, ResponseId};
use majorquiz::model::{Activation, FitOptions, LayerSpec};
use majorquiz::storage::DataStore;
use majorquiz::{Classifier, TrainOutcome};

use crate::fixture::{QuizFixture, biologist, engineer, mathematician, response};

fn small_config() -> ClassifierConfig {
    ClassifierConfig {
        hidden_layers: vec![LayerSpec::new(16, Activation::Relu)],
        learning_rate: 0.01,
        seed: 7,
    }
}

fn quiet_fit(epochs: u32) -> FitOptions {
    FitOptions {
        epochs,
        batch_size: 8,
        verbosity: 0,
    }
}

fn labelled_fixture() -> QuizFixture {
    let fx = QuizFixture::new();
    fx.label(&engineer(), 1, 10);
    fx.label(&biologist(), 2, 10);
    fx.label(&mathematician(), 3, 10);
    fx
}

#[test]
fn catalogs_follow_store_order() {
    let fx = QuizFixture::new();
    let classifier = Classifier::new(&fx.db, &small_config()).expect("classifier");

    let questions = classifier.questions();
    assert_eq!(questions.input_dimension(), 6);
    let offsets: Vec<usize> = questions
        .question_ids()
        .map(|qid| questions.offset(&qid.into()).expect("offset"))
        .collect();
    assert_eq!(offsets, vec![0, 2, 5]);

    let courses = classifier.courses();
    assert_eq!(courses.len(), 3);
    let label = courses
        .get_label_vector(&CourseRef::number("7"))
        .expect("label");
    assert_eq!(&label[..], &[0.0, 1.0, 0.0]);
    assert_eq!(
        courses.get_index(&CourseRef::name("Mathematics")).expect("index"),
        2
    );
}

#[test]
fn trained_classifier_ranks_the_labelled_course_first() {
    let fx = labelled_fixture();
    let mut classifier = Classifier::new(&fx.db, &small_config()).expect("classifier");

    let outcome = classifier.train(&quiet_fit(300)).expect("train");
    let TrainOutcome::Trained(report) = outcome else {
        panic!("expected training to run, got {outcome:?}");
    };
    assert_eq!(report.samples, 30);
    assert_eq!(report.epochs.len(), 300);
    assert!(classifier.is_trained());

    let first = report.epochs.first().expect("first epoch").loss;
    let last = report.last().expect("last epoch").loss;
    assert!(last < first, "loss did not fall: {first} -> {last}");

    for (answers, expected) in [(engineer(), "6"), (biologist(), "7"), (mathematician(), "18")] {
        let ranked = classifier
            .predict_from_answers(answers.iter().map(|(&q, &a)| (q, a)))
            .expect("predict");
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].course_number, expected);
        let total: f64 = ranked.iter().map(|r| r.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(ranked.windows(2).all(|w| w[0].probability >= w[1].probability));
    }
}

#[test]
fn stored_response_predicts_like_its_answers() {
    let fx = labelled_fixture();
    let mut classifier = Classifier::new(&fx.db, &small_config()).expect("classifier");
    classifier.train(&quiet_fit(50)).expect("train");

    let rid = fx.db.store_response(&biologist(), None).expect("store");
    let by_id = classifier.predict_from_response_id(rid).expect("by id");
    let by_answers = classifier
        .predict_from_answers(biologist().iter().map(|(&q, &a)| (q, a)))
        .expect("by answers");
    assert_eq!(by_id, by_answers);
}

#[test]
fn partial_answers_rank_every_course() {
    let fx = labelled_fixture();
    let mut classifier = Classifier::new(&fx.db, &small_config()).expect("classifier");
    classifier.train(&quiet_fit(20)).expect("train");

    let ranked = classifier
        .predict_from_answers([(QuestionId::new(2), AnswerId::new(4))])
        .expect("partial");
    assert_eq!(ranked.len(), 3);
}

#[test]
fn answers_can_be_given_by_text() {
    let fx = QuizFixture::new();
    let mut classifier = Classifier::new(&fx.db, &small_config()).expect("classifier");

    let rid = classifier
        .store_training_example(
            [
                ("Which lab sounds most fun?", "Wet lab"),
                ("Pick a weekend", "Hiking"),
                ("Do you like proofs?", "No"),
            ],
            Some(&CourseRef::name("Biology")),
        )
        .expect("store");

    let stored = fx.db.load_response(rid).expect("load").expect("present");
    assert_eq!(stored, biologist());

    let labelled = fx.db.load_labelled_responses().expect("labelled");
    assert_eq!(labelled.len(), 1);
    assert_eq!(labelled[0].course, CourseId::new(2));
}

#[test]
fn untrained_classifier_still_ranks() {
    let fx = QuizFixture::new();
    let mut classifier = Classifier::new(&fx.db, &small_config()).expect("classifier");

    assert_eq!(
        classifier.train(&quiet_fit(5)).expect("train"),
        TrainOutcome::NoData
    );
    assert!(!classifier.is_trained());

    let rid = fx.db.store_response(&engineer(), None).expect("store");
    let ranked = classifier.predict_from_response_id(rid).expect("predict");
    assert_eq!(ranked.len(), 3);
}

#[test]
fn corpus_is_reloaded_only_after_invalidation() {
    let fx = QuizFixture::new();
    let mut classifier = Classifier::new(&fx.db, &small_config()).expect("classifier");

    fx.label(&engineer(), 1, 2);
    let TrainOutcome::Trained(report) = classifier.train(&quiet_fit(1)).expect("train") else {
        panic!("expected training");
    };
    assert_eq!(report.samples, 2);

    fx.label(&mathematician(), 3, 3);
    let TrainOutcome::Trained(report) = classifier.train(&quiet_fit(1)).expect("train") else {
        panic!("expected training");
    };
    assert_eq!(report.samples, 2);

    classifier.invalidate_corpus();
    let TrainOutcome::Trained(report) = classifier.train(&quiet_fit(1)).expect("train") else {
        panic!("expected training");
    };
    assert_eq!(report.samples, 5);
}

#[test]
fn same_seed_gives_same_ranking() {
    let fx = labelled_fixture();
    let probe = response(&[(1, 1), (2, 4), (3, 6)]);

    let rank = || {
        let mut classifier = Classifier::new(&fx.db, &small_config()).expect("classifier");
        classifier.train(&quiet_fit(10)).expect("train");
        classifier
            .predict_from_answers(probe.iter().map(|(&q, &a)| (q, a)))
            .expect("predict")
    };
    assert_eq!(rank(), rank());
}

#[test]
fn unknown_response_id_is_reported() {
    let fx = QuizFixture::new();
    let classifier = Classifier::new(&fx.db, &small_config()).expect("classifier");
    let err = classifier
        .predict_from_response_id(ResponseId::new(999))
        .expect_err("missing response");
    assert!(err.to_string().contains("R999"));
}
