//! Quality command - null rates, duplicates and required columns.

use std::path::PathBuf;

use colored::Colorize;
use uptake::{DataTable, QualityThresholds, Value};

use super::{CommandResult, Context};
use crate::cli::OutputFormat;
use crate::output;

pub fn run(
    ctx: &Context,
    file: PathBuf,
    require: Vec<String>,
    warn: Option<f64>,
    error: Option<f64>,
) -> CommandResult {
    let table = ctx.load(&file)?;

    let defaults = ctx.analyzer.config().quality;
    let thresholds = QualityThresholds {
        warning_null_pct: warn.unwrap_or(defaults.warning_null_pct),
        error_null_pct: error.unwrap_or(defaults.error_null_pct),
    };
    let mut required: Vec<&str> = require.iter().map(String::as_str).collect();
    if required.is_empty() {
        required.push(ctx.analyzer.target_column());
    }

    let report = uptake::inspect(&table, &required, &thresholds)?;

    match ctx.format {
        OutputFormat::Json => return output::print_json(&report),
        OutputFormat::Csv => {
            let headers = ["Column", "Null Count", "Null %"].map(String::from).to_vec();
            let rows = report
                .columns
                .iter()
                .map(|c| {
                    vec![
                        Value::from(c.column.as_str()),
                        Value::Int(c.null_count as i64),
                        Value::Float(c.null_percentage),
                    ]
                })
                .collect();
            return output::emit(&DataTable::new(headers, rows)?, ctx.format);
        }
        OutputFormat::Table => {}
    }

    output::heading("Dataset:");
    println!("  Rows:           {}", report.row_count.to_string().white().bold());
    println!("  Columns:        {}", report.column_count.to_string().white().bold());
    println!("  Duplicate rows: {}", report.duplicate_rows);
    println!("  Memory:         {:.2} KB", report.memory_bytes as f64 / 1024.0);

    let sparse: Vec<_> = report.columns.iter().filter(|c| c.null_count > 0).collect();
    output::heading("Columns with missing values:");
    if sparse.is_empty() {
        println!("  {}", "none".green());
    }
    for c in sparse {
        println!(
            "  {:<24} {:>8} {:>8.2}%",
            c.column, c.null_count, c.null_percentage
        );
    }

    if !report.warnings.is_empty() {
        output::heading("Warnings:");
        for w in &report.warnings {
            println!("  {} {}: {}", "⚠".yellow(), w.column.white(), w.message);
        }
    }
    if !report.errors.is_empty() {
        output::heading("Errors:");
        for e in &report.errors {
            println!("  {} {}: {}", "✗".red(), e.column.white(), e.message);
        }
    }

    println!();
    if report.is_valid {
        println!("{}", "Required columns present.".green().bold());
    } else {
        println!(
            "{} {}",
            "Missing required columns:".red().bold(),
            report.missing_required.join(", ")
        );
    }

    Ok(())
}
