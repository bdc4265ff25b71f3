//! Label vectors and ranking order.

use proptest::prelude::*;

use majorquiz::core::{CourseCatalog, CourseRef};

use crate::strategies::arb_courses;

fn arb_courses_with_scores() -> impl Strategy<Value = (Vec<majorquiz::storage::CourseRecord>, Vec<f64>)>
{
    arb_courses().prop_flat_map(|courses| {
        let scores = prop::collection::vec(0.0f64..1.0, courses.len());
        (Just(courses), scores)
    })
}

proptest! {
    #[test]
    fn label_vectors_are_one_hot_at_the_course_index(records in arb_courses()) {
        let catalog = CourseCatalog::build(records.clone()).expect("catalog");
        for (position, record) in records.iter().enumerate() {
            let course = CourseRef::Id(record.id);
            prop_assert_eq!(catalog.get_index(&course).expect("index"), position);

            let label = catalog.get_label_vector(&course).expect("label");
            prop_assert_eq!(label.len(), records.len());
            prop_assert_eq!(label.iter().filter(|&&x| x == 1.0).count(), 1);
            prop_assert_eq!(label[position], 1.0);
            prop_assert_eq!(label.iter().sum::<f64>(), 1.0);
        }
    }

    #[test]
    fn ranking_is_a_sorted_permutation((records, scores) in arb_courses_with_scores()) {
        let catalog = CourseCatalog::build(records.clone()).expect("catalog");
        let ranked = catalog.rank(&scores).expect("rank");

        prop_assert_eq!(ranked.len(), records.len());
        prop_assert!(ranked.windows(2).all(|w| w[0].probability >= w[1].probability));

        let mut numbers: Vec<&str> = ranked.iter().map(|r| r.course_number.as_str()).collect();
        numbers.sort_unstable();
        let mut expected: Vec<&str> = records.iter().map(|r| r.number.as_str()).collect();
        expected.sort_unstable();
        prop_assert_eq!(numbers, expected);

        for entry in &ranked {
            let index = catalog
                .get_index(&CourseRef::number(entry.course_number.clone()))
                .expect("index");
            prop_assert_eq!(entry.probability, scores[index]);
        }
    }

    #[test]
    fn ties_keep_course_order(count in 1usize..8) {
        let records: Vec<_> = (1..=count)
            .map(|n| majorquiz::storage::CourseRecord {
                id: majorquiz::core::CourseId::new(i64::try_from(n).unwrap_or(i64::MAX)),
                number: n.to_string(),
                name: format!("Course {n}"),
            })
            .collect();
        let catalog = CourseCatalog::build(records).expect("catalog");
        let uniform = vec![1.0 / count as f64; count];
        let ranked = catalog.rank(&uniform).expect("rank");
        let numbers: Vec<String> = ranked.into_iter().map(|r| r.course_number).collect();
        let expected: Vec<String> = (1..=count).map(|n| n.to_string()).collect();
        prop_assert_eq!(numbers, expected);
    }

    #[test]
    fn wrong_probability_count_is_rejected(records in arb_courses(), extra in 1usize..3) {
        let catalog = CourseCatalog::build(records.clone()).expect("catalog");
        let scores = vec![0.5; records.len() + extra];
        prop_assert!(catalog.rank(&scores).is_err());
    }
}
