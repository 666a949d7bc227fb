//! Time command - acceptance by time of day and expiration.

use std::path::PathBuf;

use colored::Colorize;
use uptake::{DataTable, Value};

use super::{CommandResult, Context};
use crate::cli::OutputFormat;
use crate::output;

fn timing_table(timings: &[uptake::CouponTiming]) -> uptake::Result<DataTable> {
    let headers = [
        "Coupon Type",
        "Best Time",
        "Best Rate (%)",
        "Worst Time",
        "Worst Rate (%)",
    ]
    .map(String::from)
    .to_vec();
    let rows = timings
        .iter()
        .map(|t| {
            vec![
                Value::from(t.coupon.as_str()),
                Value::from(t.best.as_ref().map(|b| b.time.as_str())),
                Value::from(t.best.as_ref().map(|b| b.acceptance_rate)),
                Value::from(t.worst.as_ref().map(|w| w.time.as_str())),
                Value::from(t.worst.as_ref().map(|w| w.acceptance_rate)),
            ]
        })
        .collect();
    DataTable::new(headers, rows)
}

pub fn run(ctx: &Context, file: PathBuf, coupon: Option<String>, by_coupon: bool) -> CommandResult {
    let table = ctx.load(&file)?;

    if by_coupon {
        let timings = ctx.analyzer.best_times_by_coupon(&table)?;
        if ctx.format == OutputFormat::Json {
            return output::print_json(&timings);
        }
        if ctx.is_text() {
            output::heading("Optimal times by coupon type:");
        }
        return output::emit(&timing_table(&timings)?, ctx.format);
    }

    let patterns = ctx.analyzer.time_patterns(&table, coupon.as_deref())?;
    if ctx.format == OutputFormat::Json {
        return output::print_json(&patterns);
    }

    let headers = ["time", "Total", "Accepted", "AcceptanceRate"]
        .map(String::from)
        .to_vec();
    let rows = patterns
        .by_time
        .iter()
        .map(|b| {
            vec![
                Value::from(b.time.as_str()),
                Value::Int(b.total as i64),
                Value::Int(b.accepted as i64),
                Value::from(b.acceptance_rate),
            ]
        })
        .collect();
    let by_time = DataTable::new(headers, rows)?;

    if ctx.format == OutputFormat::Csv {
        return output::emit(&by_time, ctx.format);
    }

    if let Some(coupon) = &patterns.coupon_type {
        println!("{} {} ({} rows)", "Coupon type:".cyan(), coupon.white().bold(), patterns.rows);
    }
    match (&patterns.best, &patterns.worst) {
        (Some(best), Some(worst)) => {
            println!(
                "Best time:  {} ({})",
                best.time.green().bold(),
                format!("{:.2}%", best.acceptance_rate).green()
            );
            println!(
                "Worst time: {} ({})",
                worst.time.red().bold(),
                format!("{:.2}%", worst.acceptance_rate).red()
            );
        }
        _ => println!("{} no rows to analyze", "Note:".yellow()),
    }

    output::heading("Acceptance by time of day:");
    output::print_table(&by_time);

    output::heading("Acceptance by expiration:");
    output::print_table(&patterns.by_expiration.to_table()?);

    output::heading("Time × expiration (%):");
    output::print_table(&patterns.matrix.rounded(1).to_table()?);

    Ok(())
}
