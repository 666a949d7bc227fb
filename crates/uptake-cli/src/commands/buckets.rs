//! Buckets command - remap a column into coarser segments and rate them.

use std::path::PathBuf;

use uptake::Buckets;

use super::{split_assignment, split_list, CommandResult, Context};
use crate::cli::OutputFormat;
use crate::output;

/// Low/High split of the visit-frequency vocabulary.
fn default_buckets() -> Buckets {
    Buckets::new()
        .with_bucket("Low", ["never", "less1"])
        .with_bucket("High", ["1~3", "4~8", "gt8"])
}

fn parse_buckets(args: &[String]) -> Result<Buckets, String> {
    if args.is_empty() {
        return Ok(default_buckets());
    }
    args.iter().try_fold(Buckets::new(), |buckets, arg| {
        let (label, values) = split_assignment(arg, "--bucket")?;
        Ok(buckets.with_bucket(label, split_list(values)))
    })
}

pub fn run(ctx: &Context, file: PathBuf, column: String, buckets: Vec<String>) -> CommandResult {
    let buckets = parse_buckets(&buckets)?;
    let table = ctx.load(&file)?;

    let segment_column = format!("{}Segment", column);
    let with_segments = ctx
        .analyzer
        .with_bucket_column(&table, &column, &segment_column, &buckets)?;
    let result = ctx.analyzer.rates(&with_segments, &[segment_column.as_str()])?;

    if ctx.format == OutputFormat::Json {
        return output::print_json(&result);
    }
    if ctx.is_text() {
        output::heading(&format!("Acceptance by {} bucket:", column));
    }
    output::emit(&result.to_table()?, ctx.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_buckets_keeps_order() {
        let buckets = parse_buckets(&["Z=a,b".to_string(), "A=c".to_string()]).unwrap();
        assert_eq!(buckets.labels().collect::<Vec<_>>(), ["Z", "A"]);
    }

    #[test]
    fn test_default_buckets() {
        let buckets = parse_buckets(&[]).unwrap();
        assert_eq!(buckets.labels().collect::<Vec<_>>(), ["Low", "High"]);
        assert!(parse_buckets(&["nolabel".to_string()]).is_err());
    }
}
