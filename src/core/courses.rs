//! Course catalog: course identity, label index and one-hot label vectors.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use crate::core::ids::{CourseId, CourseRef};
use crate::core::resolver::Resolver;
use crate::error::{EntityKind, QuizError, Result};
use crate::storage::{CourseRecord, DataStore};

/// Display form of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseBundle {
    pub id: CourseId,
    pub number: String,
    pub name: String,
}

/// One line of a prediction, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCourse {
    pub course_number: String,
    pub course_name: String,
    pub probability: f64,
}

pub struct CourseCatalog {
    courses: BTreeMap<CourseId, CourseBundle>,
    index: HashMap<CourseId, usize>,
    resolver: Resolver<CourseRef, CourseId>,
    labels: RwLock<HashMap<CourseId, Arc<[f64]>>>,
}

impl std::fmt::Debug for CourseCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseCatalog")
            .field("courses", &self.courses.len())
            .field("cached_labels", &self.labels.read().len())
            .finish_non_exhaustive()
    }
}

impl CourseCatalog {
    pub fn load(store: &impl DataStore) -> Result<Self> {
        Self::build(store.load_courses()?)
    }

    /// Index courses by ascending id.
    ///
    /// A course number or name shared by two courses fails with a duplicate
    /// error, since the alias could not resolve to one course.
    pub fn build(records: Vec<CourseRecord>) -> Result<Self> {
        let mut courses = BTreeMap::new();
        let mut resolver = Resolver::new(EntityKind::Course);
        for record in records {
            if courses.contains_key(&record.id) {
                return Err(QuizError::duplicate(EntityKind::Course, record.id));
            }
            resolver.bind(
                [
                    CourseRef::Id(record.id),
                    CourseRef::Number(record.number.clone()),
                    CourseRef::Name(record.name.clone()),
                ],
                record.id,
            )?;
            courses.insert(
                record.id,
                CourseBundle {
                    id: record.id,
                    number: record.number,
                    name: record.name,
                },
            );
        }
        let index = courses
            .keys()
            .enumerate()
            .map(|(position, cid)| (*cid, position))
            .collect();

        debug!(courses = courses.len(), "built course catalog");

        Ok(Self {
            courses,
            index,
            resolver,
            labels: RwLock::new(HashMap::new()),
        })
    }

    pub fn course_id(&self, course: &CourseRef) -> Result<CourseId> {
        self.resolver.resolve(course)
    }

    /// Zero-based position of the course in every label vector.
    pub fn get_index(&self, course: &CourseRef) -> Result<usize> {
        let cid = self.course_id(course)?;
        self.index
            .get(&cid)
            .copied()
            .ok_or_else(|| QuizError::not_found(EntityKind::Course, cid))
    }

    /// One-hot vector for the course, computed on first use.
    pub fn get_label_vector(&self, course: &CourseRef) -> Result<Arc<[f64]>> {
        let cid = self.course_id(course)?;
        if let Some(cached) = self.labels.read().get(&cid) {
            return Ok(Arc::clone(cached));
        }
        let position = self.get_index(&CourseRef::Id(cid))?;
        let mut label = vec![0.0; self.len()];
        label[position] = 1.0;
        let label: Arc<[f64]> = label.into();
        Ok(Arc::clone(self.labels.write().entry(cid).or_insert(label)))
    }

    pub fn get_bundle(&self, course: &CourseRef) -> Result<&CourseBundle> {
        let cid = self.course_id(course)?;
        self.courses
            .get(&cid)
            .ok_or_else(|| QuizError::not_found(EntityKind::Course, cid))
    }

    /// Course ids in index order. Each call starts a fresh iterator.
    pub fn ids(&self) -> impl Iterator<Item = CourseId> + '_ {
        self.courses.keys().copied()
    }

    pub fn bundles(&self) -> impl Iterator<Item = &CourseBundle> + '_ {
        self.courses.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Pair every course with its probability and sort best first.
    ///
    /// Equal probabilities keep ascending course-id order.
    pub fn rank(&self, probabilities: &[f64]) -> Result<Vec<RankedCourse>> {
        if probabilities.len() != self.len() {
            return Err(QuizError::DimensionMismatch {
                subject: "course probabilities".to_string(),
                expected: self.len(),
                got: probabilities.len(),
            });
        }
        // courses iterate in index order, so position i is probabilities[i]
        let mut ranked: Vec<RankedCourse> = self
            .courses
            .values()
            .zip(probabilities)
            .map(|(bundle, &probability)| RankedCourse {
                course_number: bundle.number.clone(),
                course_name: bundle.name.clone(),
                probability,
            })
            .collect();
        ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        Ok(ranked)
    }
}
