//! Rendering of result tables as text, CSV or JSON.

use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use uptake::{DataTable, Value};

use crate::cli::OutputFormat;

type BoxResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Text form of a cell; nulls render empty.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Float(f) => format!("{:.2}", f),
        other => other.label(),
    }
}

/// Print a table as aligned text columns.
pub fn print_table(table: &DataTable) {
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let widths: Vec<usize> = table
        .headers()
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line: Vec<String> = table
        .headers()
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_line.join("  ").cyan().bold());

    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    println!("{}", rule.join("  ").dimmed());

    for (row, values) in cells.iter().zip(table.rows()) {
        let line: Vec<String> = row
            .iter()
            .zip(values)
            .zip(&widths)
            .map(|((text, value), w)| match value {
                Value::Int(_) | Value::Float(_) => format!("{:>width$}", text, width = w),
                _ => format!("{:<width$}", text, width = w),
            })
            .collect();
        println!("{}", line.join("  "));
    }

    println!("{}", format!("({} rows)", table.row_count()).dimmed());
}

/// Write a table as CSV.
pub fn write_csv<W: Write>(table: &DataTable, writer: W) -> BoxResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.headers())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(|v| match v {
            Value::Null => String::new(),
            other => other.label(),
        }))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a table as a CSV file.
pub fn save_csv(table: &DataTable, path: &Path) -> BoxResult<()> {
    let file = std::fs::File::create(path)
        .map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
    write_csv(table, file)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> BoxResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Emit a table in the requested format.
///
/// JSON output renders the table as an array of records.
pub fn emit(table: &DataTable, format: OutputFormat) -> BoxResult<()> {
    match format {
        OutputFormat::Table => {
            print_table(table);
            Ok(())
        }
        OutputFormat::Csv => write_csv(table, io::stdout().lock()),
        OutputFormat::Json => print_json(&table.to_records()),
    }
}

/// Section heading for text output.
pub fn heading(title: &str) {
    println!();
    println!("{}", title.yellow().bold());
}

/// Rate with a colour hinting whether it is above or below a baseline.
pub fn colored_rate(rate: f64, baseline: Option<f64>) -> String {
    let text = format!("{:.2}%", rate);
    match baseline {
        Some(base) if rate > base => text.green().to_string(),
        Some(base) if rate < base => text.red().to_string(),
        _ => text.white().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_renders_nulls_empty() {
        let table = DataTable::from_columns(vec![
            ("coupon", vec![Value::from("Bar"), Value::Null]),
            ("rate", vec![Value::Float(12.5), Value::Int(3)]),
        ])
        .unwrap();
        let mut buf = Vec::new();
        write_csv(&table, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "coupon,rate\nBar,12.5\n,3\n");
    }

    #[test]
    fn test_save_csv_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.csv");
        let table = DataTable::from_columns(vec![("time", vec![Value::from("7AM")])]).unwrap();

        save_csv(&table, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "time\n7AM\n");
        assert!(save_csv(&table, &dir.path().join("missing/rates.csv")).is_err());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&Value::Float(66.666)), "66.67");
        assert_eq!(cell_text(&Value::from("7AM")), "7AM");
    }
}
