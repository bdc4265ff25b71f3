//! Generators for well-formed catalogs and responses.

use proptest::prelude::*;
use proptest::sample::Index;

use majorquiz::core::{AnswerId, CourseId, QuestionId};
use majorquiz::storage::{ChoiceRecord, CourseRecord, QuestionRecord, ResponseMap};

/// Questions with ascending, possibly sparse ids. Each question has 2-4
/// distinct one-hot-ish encodings of width 1-4.
pub fn arb_questions() -> impl Strategy<Value = Vec<QuestionRecord>> {
    prop::collection::vec((1usize..5, 2usize..5, 1i64..4), 1..6).prop_map(|shapes| {
        let mut qid = 0;
        let mut aid = 100;
        shapes
            .into_iter()
            .map(|(dimension, choices, gap)| {
                qid += gap;
                let choices = (0..choices)
                    .map(|n| {
                        aid += 1;
                        let mut encoding = vec![0; dimension];
                        encoding[n % dimension] = i64::try_from(n / dimension + 1).unwrap_or(1);
                        ChoiceRecord {
                            id: AnswerId::new(aid),
                            text: format!("choice {n}"),
                            encoding,
                        }
                    })
                    .collect();
                QuestionRecord {
                    id: QuestionId::new(qid),
                    text: format!("question {qid}"),
                    choices,
                }
            })
            .collect()
    })
}

/// A catalog together with one picked choice per question and a mask saying
/// which of those picks are kept.
pub fn arb_catalog_with_response()
-> impl Strategy<Value = (Vec<QuestionRecord>, Vec<(Index, bool)>)> {
    arb_questions().prop_flat_map(|questions| {
        let picks = prop::collection::vec((any::<Index>(), any::<bool>()), questions.len());
        (Just(questions), picks)
    })
}

/// Resolve picks into a response map. With `partial`, masked-out questions
/// are left unanswered.
pub fn response_from(
    questions: &[QuestionRecord],
    picks: &[(Index, bool)],
    partial: bool,
) -> ResponseMap {
    questions
        .iter()
        .zip(picks)
        .filter(|(_, (_, keep))| !partial || *keep)
        .map(|(question, (index, _))| {
            let choice = index.get(&question.choices);
            (question.id, choice.id)
        })
        .collect()
}

/// 1-8 courses with distinct numbers and names.
pub fn arb_courses() -> impl Strategy<Value = Vec<CourseRecord>> {
    (1usize..9).prop_map(|count| {
        (1..=count)
            .map(|n| CourseRecord {
                id: CourseId::new(i64::try_from(n).unwrap_or(i64::MAX)),
                number: n.to_string(),
                name: format!("Course {n}"),
            })
            .collect()
    })
}
