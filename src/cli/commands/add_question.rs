//! mq add-question - Store a new question with its answer choices

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::emit_ok;
use crate::error::{QuizError, Result};
use crate::storage::store::{format_encoding, parse_encoding};
use crate::storage::{DataStore, NewChoice};

#[derive(Args, Debug)]
pub struct AddQuestionArgs {
    /// Question text; must not match an existing question
    #[arg(long)]
    pub text: String,

    /// Answer choice as TEXT=VECTOR, e.g. "Yes=1,0" (repeat for each choice)
    #[arg(long = "choice", value_name = "TEXT=VECTOR", required = true)]
    pub choices: Vec<String>,
}

/// Split `"text=1,0,0"` at the last `=`, so choice text may contain `=`.
pub fn parse_choice(raw: &str) -> Result<NewChoice> {
    let (text, vector) = raw.rsplit_once('=').ok_or_else(|| {
        QuizError::Validation(format!("choice {raw:?} is not TEXT=VECTOR"))
    })?;
    let text = text.trim();
    if text.is_empty() {
        return Err(QuizError::Validation(format!("choice {raw:?} has no text")));
    }
    let encoding = parse_encoding(vector, format!("choice {text:?}"))?;
    Ok(NewChoice::new(text, encoding))
}

pub fn run(ctx: &AppContext, args: &AddQuestionArgs) -> Result<()> {
    let choices = args
        .choices
        .iter()
        .map(|raw| parse_choice(raw))
        .collect::<Result<Vec<_>>>()?;
    let record = ctx.db.store_question(&args.text, &choices)?;

    if ctx.json {
        return emit_ok(&record);
    }
    if ctx.quiet {
        return Ok(());
    }

    println!(
        "{} Added {} {}",
        "✓".green().bold(),
        record.id.to_string().cyan().bold(),
        record.text.bold()
    );
    for choice in &record.choices {
        println!(
            "    {} {} [{}]",
            choice.id.to_string().dimmed(),
            choice.text,
            format_encoding(&choice.encoding)
        );
    }
    Ok(())
}
