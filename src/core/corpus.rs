//! Training corpus: every labelled response as a (feature, label) row pair.

use ndarray::Array2;
use tracing::debug;

use crate::core::catalog::QuestionCatalog;
use crate::core::courses::CourseCatalog;
use crate::core::ids::CourseRef;
use crate::error::Result;
use crate::model::stack_rows;
use crate::storage::DataStore;

/// Row `i` of `data` is the response whose label is row `i` of `labels`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingCorpus {
    pub data: Array2<f64>,
    pub labels: Array2<f64>,
}

impl TrainingCorpus {
    /// Load and encode every labelled response.
    ///
    /// Returns `Ok(None)` when the store holds no labelled responses.
    pub fn load(
        store: &impl DataStore,
        questions: &QuestionCatalog,
        courses: &CourseCatalog,
    ) -> Result<Option<Self>> {
        let responses = store.load_labelled_responses()?;
        if responses.is_empty() {
            debug!("no labelled responses, corpus is empty");
            return Ok(None);
        }

        let mut features = Vec::with_capacity(responses.len());
        let mut labels = Vec::with_capacity(responses.len());
        for response in &responses {
            features.push(questions.vectorize(&response.answers));
            labels.push(courses.get_label_vector(&CourseRef::Id(response.course))?);
        }

        let corpus = Self {
            data: stack_rows(&features, questions.input_dimension())?,
            labels: stack_rows(&labels, courses.len())?,
        };
        debug!(
            rows = corpus.len(),
            input_dimension = corpus.data.ncols(),
            courses = corpus.labels.ncols(),
            "loaded training corpus"
        );
        Ok(Some(corpus))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }
}
