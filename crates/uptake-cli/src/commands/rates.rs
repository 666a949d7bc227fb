//! Rates command - acceptance rates, overall or grouped.

use std::path::PathBuf;

use colored::Colorize;

use super::{CommandResult, Context};
use crate::cli::{OrderChoice, OutputFormat};
use crate::output;

pub fn run(
    ctx: &Context,
    file: PathBuf,
    group_by: Vec<String>,
    order: Option<OrderChoice>,
    sort_rate: bool,
) -> CommandResult {
    let table = ctx.load(&file)?;
    let columns: Vec<&str> = group_by.iter().map(String::as_str).collect();

    let mut result = ctx.analyzer.rates(&table, &columns)?;
    if let (Some(choice), Some(first)) = (order, columns.first()) {
        result = result.sorted_by_order(first, &ctx.order(choice))?;
    }
    if sort_rate {
        result = result.sorted_by_rate(true);
    }

    if ctx.format == OutputFormat::Json {
        return output::print_json(&result);
    }

    if ctx.is_text() {
        let title = if columns.is_empty() {
            "Overall acceptance:".to_string()
        } else {
            format!("Acceptance by {}:", columns.join(" × "))
        };
        output::heading(&title);
    }
    output::emit(&result.to_table()?, ctx.format)?;

    if ctx.is_text() && !columns.is_empty() {
        if let Some(rate) = result.overall_rate() {
            println!("Overall: {}", format!("{:.2}%", rate).white().bold());
        }
    }
    Ok(())
}
