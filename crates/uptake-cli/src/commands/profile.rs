//! Profile command - headline metrics or a single coupon type.

use std::path::PathBuf;

use colored::Colorize;
use uptake::Overview;

use super::{CommandResult, Context};
use crate::cli::OutputFormat;
use crate::output;

fn print_overview(overview: &Overview) {
    println!("  Total records:   {}", overview.total.to_string().white().bold());
    match overview.acceptance_rate {
        Some(rate) => println!("  Acceptance rate: {}", format!("{:.2}%", rate).white().bold()),
        None => println!("  Acceptance rate: {}", "n/a".dimmed()),
    }
    println!("  Accepted:        {}", overview.accepted.to_string().green());
    println!("  Declined:        {}", overview.declined.to_string().red());
}

pub fn run(ctx: &Context, file: PathBuf, coupon: Option<String>) -> CommandResult {
    let table = ctx.load(&file)?;

    let Some(coupon) = coupon else {
        let overview = ctx.analyzer.overview(&table)?;
        let coupon_column = ctx.analyzer.config().profile.coupon_column.clone();
        let by_coupon = if table.has_column(&coupon_column) {
            Some(ctx.analyzer.rates(&table, &[coupon_column.as_str()])?.sorted_by_rate(true))
        } else {
            None
        };

        match ctx.format {
            OutputFormat::Json => {
                return output::print_json(&serde_json::json!({
                    "overview": overview,
                    "by_coupon": by_coupon,
                }));
            }
            OutputFormat::Csv => {
                return match &by_coupon {
                    Some(result) => output::emit(&result.to_table()?, ctx.format),
                    None => Err(format!("Column '{}' not found", coupon_column).into()),
                };
            }
            OutputFormat::Table => {}
        }

        output::heading("Overview:");
        print_overview(&overview);
        if let Some(result) = by_coupon {
            output::heading("Acceptance by coupon type:");
            output::print_table(&result.to_table()?);
        }
        return Ok(());
    };

    let profile = ctx.analyzer.coupon_profile(&table, &coupon)?;
    match ctx.format {
        OutputFormat::Json => return output::print_json(&profile),
        OutputFormat::Csv => {
            let result = profile
                .by_frequency
                .as_ref()
                .ok_or_else(|| format!("No visit-frequency column for coupon type '{}'", coupon))?;
            return output::emit(&result.to_table()?, ctx.format);
        }
        OutputFormat::Table => {}
    }

    output::heading(&format!("Coupon type: {}", coupon));
    print_overview(&profile.overview);
    if let Some(delta) = profile.rate_delta {
        println!("  vs overall:      {}", output::colored_rate(delta, Some(0.0)));
    }

    if let (Some(column), Some(result)) = (&profile.frequency_column, &profile.by_frequency) {
        output::heading(&format!("By {} visit frequency:", column));
        output::print_table(&result.to_table()?);
    }
    if let Some(result) = &profile.by_age {
        output::heading("By age group:");
        output::print_table(&result.to_table()?);
    }
    for (column, result) in &profile.breakdowns {
        output::heading(&format!("By {}:", column));
        output::print_table(&result.to_table()?);
    }
    Ok(())
}
