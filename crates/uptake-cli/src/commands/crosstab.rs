//! Crosstab command - acceptance-rate matrix over two columns.

use std::path::PathBuf;

use super::{CommandResult, Context};
use crate::cli::{OrderChoice, OutputFormat};
use crate::output;

pub fn run(
    ctx: &Context,
    file: PathBuf,
    rows: String,
    columns: String,
    order: Option<OrderChoice>,
    long: bool,
) -> CommandResult {
    let table = ctx.load(&file)?;

    let mut matrix = ctx.analyzer.crosstab(&table, &rows, &columns)?;
    if let Some(choice) = order {
        matrix = matrix.reindex_rows(&ctx.order(choice));
    }

    if ctx.format == OutputFormat::Json {
        return if long {
            output::print_json(&matrix.melt())
        } else {
            output::print_json(&matrix)
        };
    }

    if ctx.is_text() {
        output::heading(&format!("Acceptance rate (%): {} × {}", rows, columns));
    }
    let rendered = if long {
        matrix.melt_table("Rate")?
    } else {
        matrix.rounded(2).to_table()?
    };
    output::emit(&rendered, ctx.format)
}
