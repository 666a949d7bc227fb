//! Flattened per-column summary for display.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::aggregate::round_rate;
use crate::error::Result;
use crate::input::{DataTable, Value};
use crate::schema::ColumnType;

/// One row of the column summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub data_type: ColumnType,
    pub non_null_count: usize,
    pub null_count: usize,
    pub null_percentage: f64,
    /// Distinct non-null values.
    pub unique_values: usize,
    /// First non-null value in row order; `None` for an all-null column.
    pub sample_value: Option<Value>,
}

/// Summarize every column of the table.
pub fn column_summary(table: &DataTable) -> Vec<ColumnSummary> {
    let rows = table.row_count();
    table
        .headers()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let mut distinct = HashSet::new();
            let mut null_count = 0;
            let mut sample_value = None;
            for value in table.column_values(index) {
                if value.is_null() {
                    null_count += 1;
                    continue;
                }
                if sample_value.is_none() {
                    sample_value = Some(value.clone());
                }
                distinct.insert(value);
            }
            let null_percentage = if rows == 0 {
                0.0
            } else {
                round_rate(null_count as f64 * 100.0 / rows as f64)
            };

            ColumnSummary {
                column: name.clone(),
                data_type: table.column_type(index),
                non_null_count: rows - null_count,
                null_count,
                null_percentage,
                unique_values: distinct.len(),
                sample_value,
            }
        })
        .collect()
}

/// Column summary as a table with columns `Column, DataType, Non-Null Count,
/// Null Count, Null %, Unique Values, Sample Value`.
pub fn summary_table(table: &DataTable) -> Result<DataTable> {
    let headers = [
        "Column",
        "DataType",
        "Non-Null Count",
        "Null Count",
        "Null %",
        "Unique Values",
        "Sample Value",
    ]
    .map(String::from)
    .to_vec();

    let rows = column_summary(table)
        .into_iter()
        .map(|s| {
            vec![
                Value::Text(s.column),
                Value::from(s.data_type.label()),
                Value::Int(s.non_null_count as i64),
                Value::Int(s.null_count as i64),
                Value::Float(s.null_percentage),
                Value::Int(s.unique_values as i64),
                s.sample_value.unwrap_or_default(),
            ]
        })
        .collect();

    DataTable::new(headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let table = DataTable::from_columns(vec![
            ("car", vec![Value::Null, Value::Null]),
            ("age", vec![Value::Null, Value::Int(21)]),
            ("weather", vec![Value::from("Sunny"), "Sunny".into()]),
        ])
        .unwrap();

        let summary = column_summary(&table);
        assert_eq!(summary[0].sample_value, None);
        assert_eq!(summary[0].data_type, ColumnType::Unknown);
        assert_eq!(summary[0].null_percentage, 100.0);

        assert_eq!(summary[1].sample_value, Some(Value::Int(21)));
        assert_eq!(summary[1].data_type, ColumnType::Integer);
        assert_eq!(summary[1].non_null_count, 1);

        assert_eq!(summary[2].unique_values, 1);
        assert_eq!(summary[2].data_type, ColumnType::String);
    }

    #[test]
    fn test_summary_table_columns() {
        let table = DataTable::from_columns(vec![("car", vec![Value::Null])]).unwrap();
        let out = summary_table(&table).unwrap();
        assert_eq!(out.headers()[6], "Sample Value");
        assert_eq!(out.get(0, 6), Some(&Value::Null));
        assert_eq!(out.get(0, 1), Some(&Value::from("unknown")));
    }
}
