//! mq train - Fit the classifier on the stored labelled responses

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::classifier::{Classifier, TrainOutcome};
use crate::cli::output::emit_ok;
use crate::error::Result;

#[derive(Args, Debug, Default)]
pub struct TrainArgs {
    /// Number of epochs (default: training.epochs from config)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub epochs: Option<u32>,

    /// Mini-batch size (default: training.batch_size from config)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: Option<u64>,
}

impl TrainArgs {
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn batch_size(&self) -> Option<usize> {
        self.batch_size.map(|size| size as usize)
    }
}

pub fn run(ctx: &AppContext, args: &TrainArgs) -> Result<()> {
    let options = ctx.fit_options(args.epochs, args.batch_size());
    let mut classifier = Classifier::new(&ctx.db, &ctx.config.classifier)?;
    let outcome = classifier.train(&options)?;

    if ctx.json {
        return emit_ok(match &outcome {
            TrainOutcome::NoData => serde_json::json!({ "trained": false }),
            TrainOutcome::Trained(report) => serde_json::json!({
                "trained": true,
                "samples": report.samples,
                "epochs": report.epochs,
            }),
        });
    }
    if ctx.quiet {
        return Ok(());
    }

    match outcome {
        TrainOutcome::NoData => {
            println!("{} No labelled responses to train on", "!".yellow());
            println!("  Store some with: mq submit --answer <QID>=<AID> ... --course <NUMBER>");
        }
        TrainOutcome::Trained(report) => {
            println!("{:>6}  {:>10}  {:>9}", "EPOCH".bold(), "LOSS".bold(), "ACCURACY".bold());
            for stats in &report.epochs {
                println!("{:>6}  {:>10.4}  {:>9.4}", stats.epoch, stats.loss, stats.accuracy);
            }
            println!();
            println!(
                "{} Trained on {} labelled responses",
                "✓".green().bold(),
                report.samples
            );
        }
    }
    Ok(())
}
