//! mq courses - List courses in label order

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::emit_ok;
use crate::core::{CourseCatalog, CourseId};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct CoursesArgs {}

#[derive(Debug, Serialize)]
struct CourseRow<'a> {
    index: usize,
    id: CourseId,
    number: &'a str,
    name: &'a str,
}

pub fn run(ctx: &AppContext, _args: &CoursesArgs) -> Result<()> {
    let catalog = CourseCatalog::load(&ctx.db)?;
    let rows: Vec<CourseRow<'_>> = catalog
        .bundles()
        .enumerate()
        .map(|(index, bundle)| CourseRow {
            index,
            id: bundle.id,
            number: &bundle.number,
            name: &bundle.name,
        })
        .collect();

    if ctx.json {
        return emit_ok(serde_json::json!({ "count": rows.len(), "courses": rows }));
    }

    if rows.is_empty() {
        println!("{}", "No courses found".dimmed());
        println!();
        println!("Seed the course list with: mq init");
        return Ok(());
    }

    println!("{:>5}  {:>5}  {:8}  {}", "INDEX".bold(), "ID".bold(), "NUMBER".bold(), "NAME".bold());
    println!("{}", "─".repeat(72).dimmed());
    for row in &rows {
        println!("{:>5}  {:>5}  {:8}  {}", row.index, row.id.to_string(), row.number, row.name);
    }
    println!();
    println!("{} {} courses", "Total:".dimmed(), rows.len());
    Ok(())
}
