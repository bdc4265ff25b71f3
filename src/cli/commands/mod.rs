//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use colored::Colorize;

use crate::app::AppContext;
use crate::classifier::RankedCourse;
use crate::cli::Commands;
use crate::error::Result;

pub mod add_question;
pub mod courses;
pub mod init;
pub mod predict;
pub mod questions;
pub mod submit;
pub mod train;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run(ctx, args),
        Commands::Courses(args) => courses::run(ctx, args),
        Commands::Questions(args) => questions::run(ctx, args),
        Commands::AddQuestion(args) => add_question::run(ctx, args),
        Commands::Submit(args) => submit::run(ctx, args),
        Commands::Train(args) => train::run(ctx, args),
        Commands::Predict(args) => predict::run(ctx, args),
    }
}

/// Human table of ranked courses, best first.
pub(crate) fn print_ranking(ranked: &[RankedCourse]) {
    println!(
        "{:>4}  {:>8}  {:8}  {}",
        "RANK".bold(),
        "PROB".bold(),
        "COURSE".bold(),
        "NAME".bold()
    );
    println!("{}", "─".repeat(72).dimmed());
    for (rank, course) in ranked.iter().enumerate() {
        let probability = format!("{:.4}", course.probability);
        let probability = if rank == 0 {
            probability.green().bold()
        } else {
            probability.normal()
        };
        println!(
            "{:>4}  {:>8}  {:8}  {}",
            rank + 1,
            probability,
            course.course_number,
            course.course_name
        );
    }
}
