//! mq init - Create the database and seed the reference course list

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::emit_ok;
use crate::error::Result;
use crate::storage::REFERENCE_COURSES;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Only create the schema; leave the course table as is
    #[arg(long)]
    pub no_seed: bool,
}

#[derive(Debug, Serialize)]
struct InitReport {
    db_path: String,
    schema_version: u32,
    courses_seeded: usize,
    questions: u64,
    courses: u64,
    responses: u64,
    labelled_responses: u64,
}

pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
    let courses_seeded = if args.no_seed {
        0
    } else {
        ctx.db.seed_courses(REFERENCE_COURSES)?
    };

    let report = InitReport {
        db_path: ctx.config.database.path.display().to_string(),
        schema_version: ctx.db.schema_version(),
        courses_seeded,
        questions: ctx.db.question_count()?,
        courses: ctx.db.course_count()?,
        responses: ctx.db.response_count()?,
        labelled_responses: ctx.db.labelled_response_count()?,
    };

    if ctx.json {
        return emit_ok(report);
    }
    if ctx.quiet {
        return Ok(());
    }

    println!(
        "{} Database ready at {}",
        "✓".green().bold(),
        report.db_path.cyan()
    );
    println!("  {:20} {}", "Schema version:".dimmed(), report.schema_version);
    println!("  {:20} {}", "Courses added:".dimmed(), report.courses_seeded);
    println!("  {:20} {}", "Questions:".dimmed(), report.questions);
    println!("  {:20} {}", "Courses:".dimmed(), report.courses);
    println!(
        "  {:20} {} ({} labelled)",
        "Responses:".dimmed(),
        report.responses,
        report.labelled_responses
    );
    if report.questions == 0 {
        println!();
        println!("Add questions with: mq add-question --text <TEXT> --choice <TEXT>=<VECTOR>");
    }
    Ok(())
}
