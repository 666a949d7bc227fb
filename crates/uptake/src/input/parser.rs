//! CSV/TSV loader with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Result, UptakeError};
use super::source::{DataTable, SourceMetadata};
use super::value::Value;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Columns removed right after loading (e.g. a column that is almost
    /// entirely empty).
    pub drop_columns: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
            drop_columns: Vec::new(),
        }
    }
}

/// Parses delimited files into typed [`DataTable`]s.
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let io_err = |e| UptakeError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let table = self.parse_bytes(&contents, delimiter)?;

        let dropped: Vec<String> = self
            .config
            .drop_columns
            .iter()
            .filter(|name| table.has_column(name))
            .cloned()
            .collect();
        let table = if dropped.is_empty() {
            table
        } else {
            let names: Vec<&str> = dropped.iter().map(String::as_str).collect();
            table.without_columns(&names)
        };

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            format = %format,
            "loaded table"
        );

        let mut source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        );
        source.dropped_columns = dropped;

        Ok((table, source))
    }

    /// Parse bytes directly with a known delimiter.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let raw_headers = reader.headers()?.clone();
        if raw_headers.is_empty() || raw_headers.iter().all(|h| h.trim().is_empty()) {
            return Err(UptakeError::EmptyData("No columns found".to_string()));
        }

        // Unnamed columns (e.g. an exported index) get generated names
        let headers: Vec<String> = raw_headers
            .iter()
            .enumerate()
            .map(|(i, h)| match h.trim() {
                "" => format!("column_{}", i + 1),
                name => name.to_string(),
            })
            .collect();

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            let mut row: Vec<Value> = record.iter().map(Value::parse).collect();

            // Pad short rows with nulls, truncate long ones
            row.resize(expected_cols, Value::Null);

            rows.push(row);
        }

        if rows.is_empty() {
            return Err(UptakeError::EmptyData("No data rows found".to_string()));
        }

        DataTable::new(headers, rows)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(UptakeError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance = counts
            .iter()
            .map(|&c| (c as f64 - mean).powi(2))
            .sum::<f64>()
            / counts.len() as f64;

        // Higher count with lower variance wins; tab gets a small bonus
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_parse_typed_cells() {
        let parser = Parser::new();
        let data = b"coupon,time,temperature,Y\nBar,7AM,55,1\nCoffee House,2PM,80,0\n";
        let table = parser.parse_bytes(data, b',').unwrap();

        assert_eq!(table.headers(), ["coupon", "time", "temperature", "Y"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some(&Value::from("Bar")));
        assert_eq!(table.get(1, 2), Some(&Value::Int(80)));
    }

    #[test]
    fn test_short_rows_padded_with_null() {
        let parser = Parser::new();
        let data = b"a,b,c\n1,2\n";
        let table = parser.parse_bytes(data, b',').unwrap();
        assert_eq!(table.get(0, 2), Some(&Value::Null));
    }

    #[test]
    fn test_header_only_is_empty_data() {
        let parser = Parser::new();
        let err = parser.parse_bytes(b"a,b\n", b',').unwrap_err();
        assert!(matches!(err, UptakeError::EmptyData(_)));
    }
}
