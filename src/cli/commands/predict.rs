//! mq predict - Train in-process, then rank courses for a stored response
//!
//! Weights are never persisted, so every prediction trains from the stored
//! corpus first. With the default seed the ranking is reproducible.

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::classifier::{Classifier, TrainOutcome};
use crate::cli::commands::print_ranking;
use crate::cli::commands::train::TrainArgs;
use crate::cli::output::emit_ok;
use crate::core::ResponseId;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Stored response id (as printed by `mq submit`)
    #[arg(long, value_name = "RID")]
    pub response: i64,

    /// Show only the best N courses
    #[arg(long, short = 'n')]
    pub top: Option<usize>,

    #[command(flatten)]
    pub training: TrainArgs,
}

pub fn run(ctx: &AppContext, args: &PredictArgs) -> Result<()> {
    let options = ctx.fit_options(args.training.epochs, args.training.batch_size());
    let mut classifier = Classifier::new(&ctx.db, &ctx.config.classifier)?;
    // Resolve the response before paying for a training run.
    let answers = classifier.load_response(ResponseId::new(args.response))?;
    let trained = matches!(classifier.train(&options)?, TrainOutcome::Trained(_));

    let mut ranked = classifier.predict_from_response(&answers)?;
    if let Some(top) = args.top {
        ranked.truncate(top);
    }

    if ctx.json {
        return emit_ok(serde_json::json!({
            "response_id": args.response,
            "trained": trained,
            "ranking": ranked,
        }));
    }

    if !trained {
        eprintln!(
            "{} No labelled responses yet; ranking comes from an untrained model",
            "!".yellow()
        );
    }
    print_ranking(&ranked);
    Ok(())
}
