//! Missing command - report or treat null cells.

use std::path::PathBuf;

use colored::Colorize;
use indexmap::IndexMap;
use uptake::{DataTable, MissingOutcome, MissingStrategy, Value};

use super::{split_assignment, CommandResult, Context};
use crate::cli::OutputFormat;
use crate::output;

fn parse_fill(args: &[String]) -> Result<IndexMap<String, Value>, String> {
    args.iter()
        .map(|arg| {
            let (column, value) = split_assignment(arg, "--fill")?;
            Ok((column.to_string(), Value::parse(value)))
        })
        .collect()
}

pub fn run(
    ctx: &Context,
    file: PathBuf,
    strategy: String,
    threshold: f64,
    fill: Vec<String>,
    output_path: Option<PathBuf>,
) -> CommandResult {
    let strategy = MissingStrategy::from_name(&strategy, threshold, parse_fill(&fill)?)?;
    let table = ctx.load(&file)?;

    match ctx.analyzer.handle_missing(&table, &strategy)? {
        MissingOutcome::Report(counts) => {
            if ctx.format == OutputFormat::Json {
                return output::print_json(&counts);
            }
            let headers = ["Column", "Null Count"].map(String::from).to_vec();
            let rows = counts
                .iter()
                .map(|(column, n)| vec![Value::from(column.as_str()), Value::Int(*n as i64)])
                .collect();
            if ctx.is_text() {
                output::heading("Null counts:");
            }
            output::emit(&DataTable::new(headers, rows)?, ctx.format)
        }
        MissingOutcome::Table(result) => {
            if ctx.is_text() {
                println!(
                    "{} {} → {} rows, {} → {} columns",
                    "Result:".cyan().bold(),
                    table.row_count(),
                    result.row_count(),
                    table.column_count(),
                    result.column_count()
                );
            }
            match output_path {
                Some(path) => {
                    output::save_csv(&result, &path)?;
                    if ctx.is_text() {
                        println!("{} {}", "Saved to".green().bold(), path.display().to_string().cyan());
                    }
                    Ok(())
                }
                None if ctx.is_text() => {
                    println!(
                        "Use {} to save the table, or {} to print it.",
                        "--output FILE".cyan(),
                        "--format csv".cyan()
                    );
                    Ok(())
                }
                None => output::emit(&result, ctx.format),
            }
        }
    }
}
