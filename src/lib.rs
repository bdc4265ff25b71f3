//! majorquiz - predict an academic major from multiple-choice quiz answers.
//!
//! Questions, answer choices and courses live in a [`storage::DataStore`].
//! The [`crate::core`] catalogs turn responses into fixed-width feature vectors and
//! courses into one-hot labels; the [`classifier::Classifier`] trains a
//! [`model::FeedForwardNet`] on stored labelled responses and ranks courses
//! for new ones.

pub mod app;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod model;
pub mod storage;
pub mod test_utils;

pub use classifier::{Classifier, RankedCourse, TrainOutcome};
pub use error::{QuizError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
