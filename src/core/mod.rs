//! Vectorization pipeline: identifiers, catalogs, the working response
//! vectorizer and the training corpus.

pub mod catalog;
pub mod corpus;
pub mod courses;
pub mod ids;
pub mod resolver;
pub mod vectorizer;

pub use catalog::{ChoiceSummary, QuestionCatalog, QuestionSummary};
pub use corpus::TrainingCorpus;
pub use courses::{CourseBundle, CourseCatalog, RankedCourse};
pub use ids::{AnswerId, AnswerRef, CourseId, CourseRef, QuestionId, QuestionRef, ResponseId};
pub use resolver::Resolver;
pub use vectorizer::ResponseVectorizer;
