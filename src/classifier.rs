//! The classifier: catalogs, a trainable model and ranking glued together.
//!
//! A [`Classifier`] owns its store handle, both catalogs, a working
//! [`ResponseVectorizer`] and the model. It moves through three states:
//! `Unconfigured` until [`Classifier::setup`] shapes the model, `Configured`
//! afterwards, and `Trained` once a [`Classifier::train`] call found data.
//! Predicting before any training is allowed and yields the untrained
//! network's distribution.
//!
//! The training corpus is read from the store on the first `train` call and
//! then kept for the classifier's lifetime. Responses stored afterwards are
//! not seen until [`Classifier::invalidate_corpus`] is called.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::ClassifierConfig;
use crate::core::{
    AnswerRef, CourseCatalog, CourseRef, QuestionCatalog, QuestionRef, ResponseId,
    ResponseVectorizer, TrainingCorpus,
};
use crate::error::{EntityKind, QuizError, Result};
use crate::model::{FeedForwardNet, FitOptions, FitReport, LayerSpec, TrainableModel};
use crate::storage::{DataStore, ResponseMap};

pub use crate::core::RankedCourse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierState {
    Unconfigured,
    Configured,
    Trained,
}

/// Result of a [`Classifier::train`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainOutcome {
    /// The store holds no labelled responses; nothing was fitted.
    NoData,
    Trained(FitReport),
}

#[derive(Debug)]
pub struct Classifier<S: DataStore, M: TrainableModel = FeedForwardNet> {
    store: S,
    questions: Arc<QuestionCatalog>,
    courses: CourseCatalog,
    vectorizer: ResponseVectorizer,
    model: M,
    corpus: Option<TrainingCorpus>,
    state: ClassifierState,
}

impl<S: DataStore> Classifier<S> {
    /// Load both catalogs and shape a [`FeedForwardNet`] from `config`.
    pub fn new(store: S, config: &ClassifierConfig) -> Result<Self> {
        let model = FeedForwardNet::new(config.learning_rate, config.seed);
        Self::with_model(store, model, &config.hidden_layers)
    }
}

impl<S: DataStore, M: TrainableModel> Classifier<S, M> {
    /// Load both catalogs and shape `model` with the given hidden layers.
    pub fn with_model(store: S, model: M, hidden: &[LayerSpec]) -> Result<Self> {
        let questions = Arc::new(QuestionCatalog::load(&store)?);
        let courses = CourseCatalog::load(&store)?;
        let mut classifier = Self {
            store,
            vectorizer: ResponseVectorizer::new(Arc::clone(&questions)),
            questions,
            courses,
            model,
            corpus: None,
            state: ClassifierState::Unconfigured,
        };
        classifier.setup(hidden)?;
        Ok(classifier)
    }

    /// (Re)build the model: catalog input width, `hidden` in order, then one
    /// softmax output per course. Discards any trained weights.
    pub fn setup(&mut self, hidden: &[LayerSpec]) -> Result<()> {
        if self.questions.is_empty() {
            return Err(QuizError::Validation(
                "cannot build a classifier without questions".to_string(),
            ));
        }
        if self.courses.is_empty() {
            return Err(QuizError::Validation(
                "cannot build a classifier without courses".to_string(),
            ));
        }
        self.model
            .configure(self.questions.input_dimension(), hidden, self.courses.len())?;
        self.state = ClassifierState::Configured;
        Ok(())
    }

    /// Fit the model on every labelled response.
    ///
    /// With no labelled responses this is a no-op returning
    /// [`TrainOutcome::NoData`], and the model keeps its current weights.
    pub fn train(&mut self, options: &FitOptions) -> Result<TrainOutcome> {
        if self.state == ClassifierState::Unconfigured {
            return Err(QuizError::ModelNotConfigured);
        }
        if self.corpus.is_none() {
            self.corpus = TrainingCorpus::load(&self.store, &self.questions, &self.courses)?;
        }
        let Some(corpus) = &self.corpus else {
            info!("no labelled responses, skipping training");
            return Ok(TrainOutcome::NoData);
        };

        info!(
            samples = corpus.len(),
            epochs = options.epochs,
            batch_size = options.batch_size,
            "training classifier"
        );
        let report = self.model.fit(&corpus.data, &corpus.labels, options)?;
        self.state = ClassifierState::Trained;
        if let Some(last) = report.last() {
            info!(loss = last.loss, accuracy = last.accuracy, "training finished");
        }
        Ok(TrainOutcome::Trained(report))
    }

    /// Forget the cached corpus so the next `train` reloads it.
    pub fn invalidate_corpus(&mut self) {
        self.corpus = None;
    }

    /// Score a feature vector and rank every course, best first.
    pub fn predict_ranking(&self, vector: &[f64]) -> Result<Vec<RankedCourse>> {
        if vector.len() != self.questions.input_dimension() {
            return Err(QuizError::DimensionMismatch {
                subject: "feature vector".to_string(),
                expected: self.questions.input_dimension(),
                got: vector.len(),
            });
        }
        let probabilities = self.model.predict(vector)?;
        self.courses.rank(&probabilities)
    }

    /// Read a stored response; an unknown id is a lookup error.
    pub fn load_response(&self, id: ResponseId) -> Result<ResponseMap> {
        self.store
            .load_response(id)?
            .ok_or_else(|| QuizError::not_found(EntityKind::Response, id))
    }

    /// Rank courses for a stored response. Unanswered questions zero-fill.
    pub fn predict_from_response_id(&self, id: ResponseId) -> Result<Vec<RankedCourse>> {
        self.predict_from_response(&self.load_response(id)?)
    }

    /// Rank courses for an already loaded response map.
    pub fn predict_from_response(&self, answers: &ResponseMap) -> Result<Vec<RankedCourse>> {
        self.predict_ranking(&self.questions.vectorize(answers))
    }

    /// Rank courses for an ad hoc, possibly partial, set of answers.
    pub fn predict_from_answers<I, Q, A>(&self, answers: I) -> Result<Vec<RankedCourse>>
    where
        I: IntoIterator<Item = (Q, A)>,
        Q: Into<QuestionRef>,
        A: Into<AnswerRef>,
    {
        let mut vectorizer = ResponseVectorizer::new(Arc::clone(&self.questions));
        for (question, answer) in answers {
            vectorizer.set_answer(question, answer)?;
        }
        self.predict_ranking(&vectorizer.to_vector())
    }

    /// Persist a complete response, optionally labelled with a course.
    ///
    /// Every catalog question must be answered. Nothing is stored on failure,
    /// and the working answers are cleared either way.
    pub fn store_training_example<I, Q, A>(
        &mut self,
        answers: I,
        course: Option<&CourseRef>,
    ) -> Result<ResponseId>
    where
        I: IntoIterator<Item = (Q, A)>,
        Q: Into<QuestionRef>,
        A: Into<AnswerRef>,
    {
        self.vectorizer.reset();
        let stored = self.record_and_store(answers, course);
        self.vectorizer.reset();
        stored
    }

    fn record_and_store<I, Q, A>(&mut self, answers: I, course: Option<&CourseRef>) -> Result<ResponseId>
    where
        I: IntoIterator<Item = (Q, A)>,
        Q: Into<QuestionRef>,
        A: Into<AnswerRef>,
    {
        for (question, answer) in answers {
            self.vectorizer.set_answer(question, answer)?;
        }
        self.vectorizer.assert_complete()?;
        let course = course.map(|c| self.courses.course_id(c)).transpose()?;
        self.store.store_response(self.vectorizer.answers(), course)
    }

    #[must_use]
    pub const fn state(&self) -> ClassifierState {
        self.state
    }

    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.state == ClassifierState::Trained
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionCatalog {
        &self.questions
    }

    #[must_use]
    pub const fn courses(&self) -> &CourseCatalog {
        &self.courses
    }

    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}
