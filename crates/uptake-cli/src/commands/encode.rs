//! Encode command - frequency-ranked integer codes for categorical columns.

use std::path::PathBuf;

use colored::Colorize;

use super::{CommandResult, Context};
use crate::cli::OutputFormat;
use crate::output;

pub fn run(ctx: &Context, file: PathBuf, output_path: Option<PathBuf>) -> CommandResult {
    let table = ctx.load(&file)?;
    let encoded = ctx.analyzer.encode(&table)?;

    if let Some(path) = &output_path {
        output::save_csv(&encoded.table, path)?;
        if ctx.is_text() {
            println!(
                "{} encoded table to {}",
                "Saved".green().bold(),
                path.display().to_string().cyan()
            );
        }
    }

    if ctx.format == OutputFormat::Json {
        return output::print_json(&encoded.mappings);
    }
    if ctx.is_text() {
        output::heading(&format!("Value mappings ({} columns encoded):", encoded.mappings.len()));
    }
    output::emit(&uptake::mapping_table(&encoded.mappings)?, ctx.format)
}
