//! mq questions - Show the question layout

use clap::Args;
use colored::Colorize;
use itertools::Itertools;

use crate::app::AppContext;
use crate::cli::output::emit_ok;
use crate::core::QuestionCatalog;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct QuestionsArgs {}

pub fn run(ctx: &AppContext, _args: &QuestionsArgs) -> Result<()> {
    let catalog = QuestionCatalog::load(&ctx.db)?;
    let questions = catalog.questions();

    if ctx.json {
        return emit_ok(serde_json::json!({
            "count": questions.len(),
            "input_dimension": catalog.input_dimension(),
            "questions": questions,
        }));
    }

    if questions.is_empty() {
        println!("{}", "No questions found".dimmed());
        println!();
        println!("Add one with: mq add-question --text <TEXT> --choice <TEXT>=<VECTOR>");
        return Ok(());
    }

    for question in &questions {
        println!(
            "{} {}  {}",
            question.id.to_string().cyan().bold(),
            question.text.bold(),
            format!(
                "[slot {}..{}]",
                question.offset,
                question.offset + question.dimension
            )
            .dimmed()
        );
        let choices = question
            .choices
            .iter()
            .map(|choice| format!("{} {}", choice.id.to_string().dimmed(), choice.text))
            .join(", ");
        println!("    {choices}");
    }
    println!();
    println!(
        "{} {} questions, input dimension {}",
        "Total:".dimmed(),
        questions.len(),
        catalog.input_dimension()
    );
    Ok(())
}
