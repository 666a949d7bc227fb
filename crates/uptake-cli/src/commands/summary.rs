//! Summary command - per-column type and null overview.

use std::path::PathBuf;

use super::{CommandResult, Context};
use crate::cli::OutputFormat;
use crate::output;

pub fn run(ctx: &Context, file: PathBuf) -> CommandResult {
    let table = ctx.load(&file)?;

    if ctx.format == OutputFormat::Json {
        return output::print_json(&ctx.analyzer.column_summary(&table));
    }

    if ctx.is_text() {
        output::heading("Column summary:");
    }
    output::emit(&uptake::summary_table(&table)?, ctx.format)
}
