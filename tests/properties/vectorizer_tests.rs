//! Feature layout and vectorization properties.

use std::sync::Arc;

use proptest::prelude::*;

use majorquiz::core::{QuestionCatalog, ResponseVectorizer};
use majorquiz::storage::ResponseMap;

use crate::strategies::{arb_catalog_with_response, arb_questions, response_from};

proptest! {
    #[test]
    fn offsets_are_running_sums_of_dimensions(records in arb_questions()) {
        let catalog = QuestionCatalog::build(records.clone()).expect("catalog");

        let mut expected = 0;
        for record in &records {
            let qid = record.id.into();
            prop_assert_eq!(catalog.offset(&qid).expect("offset"), expected);
            expected += catalog.dimension(&qid).expect("dimension");
        }
        prop_assert_eq!(catalog.input_dimension(), expected);

        let mut next = 0;
        for summary in catalog.questions() {
            prop_assert_eq!(summary.offset, next);
            next += summary.dimension;
        }
        prop_assert_eq!(next, expected);
    }

    #[test]
    fn empty_response_is_all_zeros(records in arb_questions()) {
        let catalog = QuestionCatalog::build(records).expect("catalog");
        let vector = catalog.vectorize(&ResponseMap::new());
        prop_assert_eq!(vector.len(), catalog.input_dimension());
        prop_assert!(vector.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn each_answer_fills_only_its_own_slot(
        (records, picks) in arb_catalog_with_response()
    ) {
        let catalog = QuestionCatalog::build(records.clone()).expect("catalog");
        let answers = response_from(&records, &picks, true);
        let vector = catalog.vectorize(&answers);
        prop_assert_eq!(vector.len(), catalog.input_dimension());

        for record in &records {
            let qid = record.id.into();
            let offset = catalog.offset(&qid).expect("offset");
            let dimension = catalog.dimension(&qid).expect("dimension");
            let slot = &vector[offset..offset + dimension];
            match answers.get(&record.id) {
                Some(&aid) => {
                    let encoding = catalog.answer_vector_by_id(aid).expect("encoding");
                    prop_assert_eq!(slot, encoding);
                }
                None => prop_assert!(slot.iter().all(|&x| x == 0.0)),
            }
        }
    }

    #[test]
    fn vectorizing_is_deterministic((records, picks) in arb_catalog_with_response()) {
        let catalog = QuestionCatalog::build(records.clone()).expect("catalog");
        let answers = response_from(&records, &picks, true);
        prop_assert_eq!(catalog.vectorize(&answers), catalog.vectorize(&answers));
    }

    #[test]
    fn complete_exactly_when_nothing_is_missing(
        (records, picks) in arb_catalog_with_response()
    ) {
        let catalog = Arc::new(QuestionCatalog::build(records.clone()).expect("catalog"));
        let mut vectorizer = ResponseVectorizer::new(Arc::clone(&catalog));
        let answers = response_from(&records, &picks, true);
        for (&qid, &aid) in &answers {
            vectorizer.set_answer(qid, aid).expect("answer belongs to question");
        }

        let missing = vectorizer.missing();
        prop_assert_eq!(missing.len(), records.len() - answers.len());
        prop_assert_eq!(vectorizer.assert_complete().is_ok(), missing.is_empty());
        prop_assert_eq!(vectorizer.to_vector(), catalog.vectorize(&answers));

        vectorizer.reset();
        prop_assert_eq!(vectorizer.missing().len(), records.len());
    }

    #[test]
    fn full_response_is_always_complete((records, picks) in arb_catalog_with_response()) {
        let catalog = Arc::new(QuestionCatalog::build(records.clone()).expect("catalog"));
        let mut vectorizer = ResponseVectorizer::new(catalog);
        for (qid, aid) in response_from(&records, &picks, false) {
            vectorizer.set_answer(qid, aid).expect("answer belongs to question");
        }
        prop_assert!(vectorizer.assert_complete().is_ok());
    }
}
