//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;

/// Major Quiz - predict an academic major from quiz responses
#[derive(Parser, Debug)]
#[command(name = "mq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Emit machine-readable JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/majorquiz/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database path, overriding the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or migrate the database and seed the course list
    Init(commands::init::InitArgs),

    /// List courses in label order
    Courses(commands::courses::CoursesArgs),

    /// List questions with their feature-vector slots
    Questions(commands::questions::QuestionsArgs),

    /// Add a question with its answer choices
    AddQuestion(commands::add_question::AddQuestionArgs),

    /// Store a complete response, optionally labelled with a course
    Submit(commands::submit::SubmitArgs),

    /// Train the classifier on every labelled response
    Train(commands::train::TrainArgs),

    /// Rank courses for a stored response
    Predict(commands::predict::PredictArgs),
}
