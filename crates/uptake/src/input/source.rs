//! Data source abstraction and metadata.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, UptakeError};
use crate::schema::ColumnType;

use super::value::Value;

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns kept after load-time drops.
    pub column_count: usize,
    /// Columns removed at load time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_columns: Vec<String>,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            dropped_columns: Vec::new(),
            loaded_at: Utc::now(),
        }
    }
}

/// Immutable in-memory table of typed cells, one row per observation.
///
/// The shape is checked on construction: header names are non-empty and
/// unique, and every row has exactly one cell per header. Operations that
/// derive a new table always go through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTable {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataTable {
    /// Create a table from headers and row-major cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for header in &headers {
            if header.is_empty() {
                return Err(UptakeError::InvalidInput(
                    "column names must not be empty".to_string(),
                ));
            }
            if !seen.insert(header.as_str()) {
                return Err(UptakeError::InvalidInput(format!(
                    "duplicate column name '{}'",
                    header
                )));
            }
        }

        for (idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(UptakeError::InvalidInput(format!(
                    "row {} has {} cells, expected {}",
                    idx,
                    row.len(),
                    headers.len()
                )));
            }
        }

        Ok(Self { headers, rows })
    }

    /// Create a table from named columns of equal length.
    pub fn from_columns<S, V>(columns: Vec<(S, Vec<V>)>) -> Result<Self>
    where
        S: Into<String>,
        V: Into<Value>,
    {
        let row_count = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut headers = Vec::with_capacity(columns.len());
        let mut rows: Vec<Vec<Value>> = (0..row_count)
            .map(|_| Vec::with_capacity(columns.len()))
            .collect();

        for (name, values) in columns {
            let name = name.into();
            if values.len() != row_count {
                return Err(UptakeError::InvalidInput(format!(
                    "column '{}' has {} values, expected {}",
                    name,
                    values.len(),
                    row_count
                )));
            }
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value.into());
            }
            headers.push(name);
        }

        Self::new(headers, rows)
    }

    /// Column headers in table order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Row-major cells.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of a column, failing with [`UptakeError::MissingColumn`].
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| UptakeError::missing_column(name))
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Get all values for a column by name.
    pub fn column<'a>(&'a self, name: &str) -> Result<impl Iterator<Item = &'a Value> + use<'a>> {
        let index = self.require_column(name)?;
        Ok(self.column_values(index))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Borrow a row as a name-addressable view.
    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        (index < self.rows.len()).then_some(RowView { table: self, index })
    }

    /// Iterate over all rows as views.
    pub fn iter_rows(&self) -> impl Iterator<Item = RowView<'_>> {
        (0..self.rows.len()).map(move |index| RowView { table: self, index })
    }

    /// Inferred type of a column, from its non-null values.
    pub fn column_type(&self, index: usize) -> ColumnType {
        ColumnType::infer(self.column_values(index))
    }

    /// New table containing the rows where `mask` is true.
    pub fn filter_rows(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.rows.len() {
            return Err(UptakeError::InvalidInput(format!(
                "mask has {} entries, table has {} rows",
                mask.len(),
                self.rows.len()
            )));
        }
        let rows = self
            .rows
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(row, _)| row.clone())
            .collect();
        Ok(Self {
            headers: self.headers.clone(),
            rows,
        })
    }

    /// New table without the named columns. Unknown names are ignored.
    pub fn without_columns(&self, names: &[&str]) -> Self {
        let keep: Vec<usize> = (0..self.headers.len())
            .filter(|&i| !names.contains(&self.headers[i].as_str()))
            .collect();
        let headers = keep.iter().map(|&i| self.headers[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Self { headers, rows }
    }

    /// New table with an extra column appended.
    pub fn with_column(&self, name: impl Into<String>, values: Vec<Value>) -> Result<Self> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(UptakeError::InvalidInput(format!(
                "column '{}' already exists",
                name
            )));
        }
        if values.len() != self.rows.len() {
            return Err(UptakeError::InvalidInput(format!(
                "column '{}' has {} values, table has {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }
        let mut headers = self.headers.clone();
        headers.push(name);
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut row = row.clone();
                row.push(value);
                row
            })
            .collect();
        Self::new(headers, rows)
    }

    /// New table with one column's cells replaced.
    pub(crate) fn replace_column(&self, index: usize, values: Vec<Value>) -> Self {
        let mut rows = self.rows.clone();
        for (row, value) in rows.iter_mut().zip(values) {
            row[index] = value;
        }
        Self {
            headers: self.headers.clone(),
            rows,
        }
    }

    /// Number of rows identical to an earlier row.
    pub fn duplicate_row_count(&self) -> usize {
        let mut seen: HashSet<&[Value]> = HashSet::with_capacity(self.rows.len());
        self.rows
            .iter()
            .filter(|row| !seen.insert(row.as_slice()))
            .count()
    }

    /// Rows as header → value maps, in column order.
    pub fn to_records(&self) -> Vec<IndexMap<String, Value>> {
        self.rows
            .iter()
            .map(|row| self.headers.iter().cloned().zip(row.iter().cloned()).collect())
            .collect()
    }

    /// Approximate memory footprint of headers and cells, in bytes.
    pub fn memory_usage(&self) -> usize {
        let headers: usize = self.headers.iter().map(|h| h.capacity()).sum();
        let cells: usize = self
            .rows
            .iter()
            .flat_map(|row| row.iter())
            .map(Value::footprint)
            .sum();
        headers + cells
    }
}

/// Borrowed view of one row, addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a DataTable,
    index: usize,
}

impl<'a> RowView<'a> {
    /// Row position in the table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell for the named column, if the column exists.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let col = self.table.column_index(column)?;
        self.table.rows[self.index].get(col)
    }

    /// All cells of the row in column order.
    pub fn values(&self) -> &'a [Value] {
        &self.table.rows[self.index]
    }
}
