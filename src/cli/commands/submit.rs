//! mq submit - Store a complete quiz response as a training example

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::classifier::Classifier;
use crate::cli::output::emit_ok;
use crate::core::{AnswerId, CourseRef, QuestionId};
use crate::error::{QuizError, Result};

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Answer as QUESTION_ID=ANSWER_ID (repeat for every question)
    #[arg(long = "answer", value_name = "QID=AID", required = true)]
    pub answers: Vec<String>,

    /// Course number to label the response with (e.g. "6")
    #[arg(long)]
    pub course: Option<String>,
}

/// Parse `"3=11"` (or `"Q3=A11"`) into ids.
pub fn parse_answer(raw: &str) -> Result<(QuestionId, AnswerId)> {
    let invalid = || QuizError::Validation(format!("answer {raw:?} is not QID=AID"));
    let (question, answer) = raw.split_once('=').ok_or_else(invalid)?;
    let question = question.trim().trim_start_matches(['Q', 'q']);
    let answer = answer.trim().trim_start_matches(['A', 'a']);
    let question: i64 = question.parse().map_err(|_| invalid())?;
    let answer: i64 = answer.parse().map_err(|_| invalid())?;
    Ok((QuestionId::new(question), AnswerId::new(answer)))
}

pub fn run(ctx: &AppContext, args: &SubmitArgs) -> Result<()> {
    let answers = args
        .answers
        .iter()
        .map(|raw| parse_answer(raw))
        .collect::<Result<Vec<_>>>()?;
    let course = args.course.as_deref().map(CourseRef::number);

    let mut classifier = Classifier::new(&ctx.db, &ctx.config.classifier)?;
    let rid = classifier.store_training_example(answers, course.as_ref())?;

    if ctx.json {
        return emit_ok(serde_json::json!({
            "response_id": rid,
            "course": args.course,
        }));
    }
    if ctx.quiet {
        return Ok(());
    }

    match &args.course {
        Some(number) => println!(
            "{} Stored response {} labelled with course {}",
            "✓".green().bold(),
            rid.to_string().cyan(),
            number.bold()
        ),
        None => println!(
            "{} Stored unlabelled response {}",
            "✓".green().bold(),
            rid.to_string().cyan()
        ),
    }
    Ok(())
}
