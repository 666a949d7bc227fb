//! Two-dimensional acceptance-rate matrices.
//!
//! Unlike [`aggregate`](super::aggregate), a cross-tabulation always spans the
//! full product of its row and column labels: combinations that never occur
//! are kept as missing cells rather than dropped.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Result, UptakeError};
use crate::input::{DataTable, Value};

use super::order::CategoryOrder;
use super::rates::read_target;

/// Acceptance-rate matrix over two categorical columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTab {
    /// Column providing the row axis.
    pub row_column: String,
    /// Column providing the column axis.
    pub column_column: String,
    pub row_labels: Vec<Value>,
    pub column_labels: Vec<Value>,
    /// `cells[r][c]` is the mean of the target for that combination times
    /// 100, or `None` when the combination has no rows.
    pub cells: Vec<Vec<Option<f64>>>,
}

/// One cell of a [`CrossTab`] in long format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTabCell {
    pub row: Value,
    pub column: Value,
    pub rate: Option<f64>,
}

impl CrossTab {
    /// Cell addressed by the text form of its labels.
    pub fn cell(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.row_labels.iter().position(|v| v.label() == row)?;
        let c = self.column_labels.iter().position(|v| v.label() == column)?;
        self.cells[r][c]
    }

    /// Number of cells with a value.
    pub fn filled_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Reindex the row axis onto a canonical order.
    ///
    /// Listed labels absent from the data become all-missing rows; rows whose
    /// label is not listed are dropped.
    pub fn reindex_rows(&self, order: &CategoryOrder) -> Self {
        let width = self.column_labels.len();
        let mut row_labels = Vec::with_capacity(order.labels().len());
        let mut cells = Vec::with_capacity(order.labels().len());

        for label in order.labels() {
            match self.row_labels.iter().position(|v| v.label() == *label) {
                Some(r) => {
                    row_labels.push(self.row_labels[r].clone());
                    cells.push(self.cells[r].clone());
                }
                None => {
                    row_labels.push(Value::Text(label.clone()));
                    cells.push(vec![None; width]);
                }
            }
        }

        Self {
            row_column: self.row_column.clone(),
            column_column: self.column_column.clone(),
            row_labels,
            column_labels: self.column_labels.clone(),
            cells,
        }
    }

    /// Copy with every cell rounded to `decimals` places.
    pub fn rounded(&self, decimals: i32) -> Self {
        let factor = 10f64.powi(decimals);
        let mut copy = self.clone();
        for cell in copy.cells.iter_mut().flatten() {
            if let Some(v) = cell {
                *v = (*v * factor).round() / factor;
            }
        }
        copy
    }

    /// Long format: one entry per (row, column) pair, row-major.
    pub fn melt(&self) -> Vec<CrossTabCell> {
        self.row_labels
            .iter()
            .zip(&self.cells)
            .flat_map(|(row, cells)| {
                self.column_labels
                    .iter()
                    .zip(cells)
                    .map(move |(column, rate)| CrossTabCell {
                        row: row.clone(),
                        column: column.clone(),
                        rate: *rate,
                    })
            })
            .collect()
    }

    /// Wide table: the row-axis column followed by one column per column label.
    pub fn to_table(&self) -> Result<DataTable> {
        let mut headers = vec![self.row_column.clone()];
        headers.extend(self.column_labels.iter().map(Value::label));
        let rows = self
            .row_labels
            .iter()
            .zip(&self.cells)
            .map(|(label, cells)| {
                let mut row = vec![label.clone()];
                row.extend(cells.iter().map(|c| Value::from(*c)));
                row
            })
            .collect();
        DataTable::new(headers, rows)
    }

    /// Long table with columns `{row_column, column_column, value_name}`.
    pub fn melt_table(&self, value_name: &str) -> Result<DataTable> {
        let headers = vec![
            self.row_column.clone(),
            self.column_column.clone(),
            value_name.to_string(),
        ];
        let rows = self
            .melt()
            .into_iter()
            .map(|cell| vec![cell.row, cell.column, Value::from(cell.rate)])
            .collect();
        DataTable::new(headers, rows)
    }
}

/// Cross-tabulate the target's mean (as a percentage) over two columns.
///
/// Labels on both axes are the distinct non-null values in natural order.
/// Rows with a null in either axis column do not contribute.
#[instrument(skip(table), fields(rows = table.row_count()))]
pub fn crosstab(
    table: &DataTable,
    row_column: &str,
    column_column: &str,
    target_column: &str,
) -> Result<CrossTab> {
    if row_column == column_column {
        return Err(UptakeError::InvalidInput(format!(
            "cannot cross-tabulate '{}' against itself",
            row_column
        )));
    }
    let flags = read_target(table, target_column)?;
    let r_idx = table.require_column(row_column)?;
    let c_idx = table.require_column(column_column)?;

    let mut sums: BTreeMap<(&Value, &Value), (usize, usize)> = BTreeMap::new();
    let mut row_set = BTreeSet::new();
    let mut col_set = BTreeSet::new();

    for (row, accepted) in table.rows().iter().zip(&flags) {
        let (r, c) = (&row[r_idx], &row[c_idx]);
        if r.is_null() || c.is_null() {
            continue;
        }
        row_set.insert(r);
        col_set.insert(c);
        let entry = sums.entry((r, c)).or_insert((0, 0));
        entry.0 += 1;
        if *accepted {
            entry.1 += 1;
        }
    }

    let cells = row_set
        .iter()
        .map(|r| {
            col_set
                .iter()
                .map(|c| {
                    sums.get(&(*r, *c))
                        .map(|&(total, accepted)| accepted as f64 / total as f64 * 100.0)
                })
                .collect()
        })
        .collect();

    Ok(CrossTab {
        row_column: row_column.to_string(),
        column_column: column_column.to_string(),
        row_labels: row_set.into_iter().cloned().collect(),
        column_labels: col_set.into_iter().cloned().collect(),
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataTable {
        DataTable::from_columns(vec![
            (
                "time",
                vec![Value::from("7AM"), "7AM".into(), "2PM".into(), "2PM".into(), "10PM".into()],
            ),
            (
                "expiration",
                vec![Value::from("1d"), "2h".into(), "1d".into(), "1d".into(), Value::Null],
            ),
            (
                "Y",
                vec![Value::Int(1), Value::Int(0), Value::Int(1), Value::Int(0), Value::Int(1)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_unobserved_cells_are_missing() {
        let tab = crosstab(&table(), "time", "expiration", "Y").unwrap();

        assert_eq!(tab.row_labels, [Value::from("2PM"), Value::from("7AM")]);
        assert_eq!(tab.column_labels, [Value::from("1d"), Value::from("2h")]);
        assert_eq!(tab.cell("2PM", "1d"), Some(50.0));
        assert_eq!(tab.cell("7AM", "2h"), Some(0.0));
        assert_eq!(tab.cell("2PM", "2h"), None);
        assert_eq!(tab.filled_cells(), 3);
    }

    #[test]
    fn test_reindex_rows() {
        let tab = crosstab(&table(), "time", "expiration", "Y")
            .unwrap()
            .reindex_rows(&CategoryOrder::time_of_day());

        let labels: Vec<String> = tab.row_labels.iter().map(Value::label).collect();
        assert_eq!(labels, ["7AM", "10AM", "2PM", "6PM", "10PM"]);
        assert_eq!(tab.cells[1], vec![None, None]);
        assert_eq!(tab.cell("7AM", "1d"), Some(100.0));
    }

    #[test]
    fn test_same_axis_rejected() {
        let err = crosstab(&table(), "time", "time", "Y").unwrap_err();
        assert!(matches!(err, UptakeError::InvalidInput(_)));
    }

    #[test]
    fn test_melt_covers_every_cell() {
        let tab = crosstab(&table(), "time", "expiration", "Y").unwrap();
        let long = tab.melt_table("AcceptanceRate").unwrap();
        assert_eq!(long.row_count(), 4);
        assert_eq!(long.headers(), ["time", "expiration", "AcceptanceRate"]);
        assert_eq!(long.get(1, 2), Some(&Value::Null));
    }
}
