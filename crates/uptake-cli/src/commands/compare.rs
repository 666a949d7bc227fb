//! Compare command - a filtered segment against all other rows.

use std::path::PathBuf;

use colored::Colorize;
use uptake::Filter;

use super::{split_assignment, split_list, CommandResult, Context};
use crate::cli::OutputFormat;
use crate::output;

/// Build a filter from `--where COLUMN=V1,V2` and `--between COLUMN=MIN..MAX`.
fn build_filter(conditions: &[String], between: &[String]) -> Result<Filter, String> {
    let mut filter = Filter::new();
    for arg in conditions {
        let (column, values) = split_assignment(arg, "--where")?;
        filter = filter.is_in(column, split_list(values));
    }
    for arg in between {
        let (column, range) = split_assignment(arg, "--between")?;
        let (min, max) = range
            .split_once("..")
            .ok_or_else(|| format!("Invalid --between '{}': expected COLUMN=MIN..MAX", arg))?;
        let parse = |s: &str| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| format!("Invalid number '{}' in --between '{}'", s, arg))
        };
        filter = filter.between(column, parse(min)?, parse(max)?);
    }
    Ok(filter)
}

pub fn run(
    ctx: &Context,
    file: PathBuf,
    conditions: Vec<String>,
    between: Vec<String>,
) -> CommandResult {
    let filter = build_filter(&conditions, &between)?;
    if filter.is_empty() {
        return Err("No segment given. Use --where COLUMN=V1,V2 or --between COLUMN=MIN..MAX".into());
    }

    let table = ctx.load(&file)?;
    let result = ctx.analyzer.compare_filter(&table, &filter)?;

    if ctx.format == OutputFormat::Json {
        return output::print_json(&result);
    }

    if ctx.is_text() {
        output::heading("Segment comparison:");
    }
    output::emit(&result.to_table()?, ctx.format)?;

    if ctx.is_text() {
        let diff = result.rate_difference();
        let text = format!("{:+.2} points", diff);
        let text = if diff > 0.0 {
            text.green()
        } else if diff < 0.0 {
            text.red()
        } else {
            text.white()
        };
        println!("Difference: {}", text.bold());
        if result.target.total == 0 {
            println!("{} the segment matches no rows", "Note:".yellow());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter() {
        let filter = build_filter(
            &["passanger=Alone,Partner".to_string()],
            &["temperature=30..80".to_string()],
        )
        .unwrap();
        assert_eq!(filter.conditions.len(), 2);

        assert!(build_filter(&[], &["temperature=30".to_string()]).is_err());
        assert!(build_filter(&[], &["temperature=a..b".to_string()]).is_err());
    }
}
