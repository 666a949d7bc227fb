//! Acceptance counts and rates, overall or per group.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Result, UptakeError};
use crate::input::{DataTable, Value};

use super::order::CategoryOrder;

/// Output column holding the row count of a group.
pub const TOTAL: &str = "Total";
/// Output column holding the number of accepted events.
pub const ACCEPTED: &str = "Accepted";
/// Output column holding the number of declined events.
pub const DECLINED: &str = "Declined";
/// Output column holding `Accepted / Total * 100`, rounded to 2 decimals.
pub const ACCEPTANCE_RATE: &str = "AcceptanceRate";

/// Round a percentage to 2 decimal places.
pub(crate) fn round_rate(pct: f64) -> f64 {
    (pct * 100.0).round() / 100.0
}

/// Read the target column as accepted/declined flags.
pub(crate) fn read_target(table: &DataTable, target_column: &str) -> Result<Vec<bool>> {
    let index = table.require_column(target_column)?;
    table
        .column_values(index)
        .enumerate()
        .map(|(row, value)| {
            value
                .as_indicator()
                .ok_or_else(|| UptakeError::InvalidTargetValue {
                    column: target_column.to_string(),
                    row,
                    value: value.to_string(),
                })
        })
        .collect()
}

/// Counts and acceptance rate for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRow {
    /// Group key values, aligned with the result's group columns.
    pub key: Vec<Value>,
    pub total: usize,
    pub accepted: usize,
    pub declined: usize,
    /// Percentage of accepted events, rounded to 2 decimals. Zero for an
    /// empty group.
    pub acceptance_rate: f64,
}

impl RateRow {
    /// Build a row from raw counts.
    pub fn from_counts(key: Vec<Value>, total: usize, accepted: usize) -> Self {
        let acceptance_rate = if total == 0 {
            0.0
        } else {
            round_rate(accepted as f64 / total as f64 * 100.0)
        };
        Self {
            key,
            total,
            accepted,
            declined: total - accepted,
            acceptance_rate,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// One row per observed group-key combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Columns the rows are grouped by; empty for a whole-table result.
    pub group_columns: Vec<String>,
    pub rows: Vec<RateRow>,
}

impl AggregationResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of `Total` over all rows.
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.total).sum()
    }

    /// Sum of `Accepted` over all rows.
    pub fn accepted(&self) -> usize {
        self.rows.iter().map(|r| r.accepted).sum()
    }

    /// Pooled acceptance rate across rows; `None` when there are no events.
    pub fn overall_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| round_rate(self.accepted() as f64 / total as f64 * 100.0))
    }

    /// Row whose key equals `key`.
    pub fn find(&self, key: &[Value]) -> Option<&RateRow> {
        self.rows.iter().find(|r| r.key == key)
    }

    /// Row whose key renders as `labels`.
    pub fn find_label(&self, labels: &[&str]) -> Option<&RateRow> {
        self.rows.iter().find(|r| {
            r.key.len() == labels.len() && r.key.iter().zip(labels).all(|(v, l)| v.label() == *l)
        })
    }

    /// Re-order rows by a canonical order on one group column.
    ///
    /// Rows whose value is not listed keep their relative order after the
    /// listed ones.
    pub fn sorted_by_order(mut self, column: &str, order: &CategoryOrder) -> Result<Self> {
        let position = self
            .group_columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| UptakeError::missing_column(column))?;
        self.rows
            .sort_by_key(|row| order.sort_key(&row.key[position]));
        Ok(self)
    }

    /// Re-order rows by acceptance rate. Ties keep their current order.
    pub fn sorted_by_rate(mut self, descending: bool) -> Self {
        self.rows.sort_by(|a, b| {
            let ord = a.acceptance_rate.total_cmp(&b.acceptance_rate);
            if descending { ord.reverse() } else { ord }
        });
        self
    }

    /// Render as a table with columns
    /// `{group columns..., Total, Accepted, Declined, AcceptanceRate}`.
    pub fn to_table(&self) -> Result<DataTable> {
        let mut headers = self.group_columns.clone();
        headers.extend([TOTAL, ACCEPTED, DECLINED, ACCEPTANCE_RATE].map(String::from));
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = row.key.clone();
                cells.push(Value::Int(row.total as i64));
                cells.push(Value::Int(row.accepted as i64));
                cells.push(Value::Int(row.declined as i64));
                cells.push(Value::Float(row.acceptance_rate));
                cells
            })
            .collect();
        DataTable::new(headers, rows)
    }
}

/// Compute acceptance counts and rates, optionally grouped.
///
/// With an empty `group_by` the result holds one row for the whole table and
/// an empty table fails with [`UptakeError::DegenerateAggregation`]. With
/// grouping, there is one row per distinct key combination present in the
/// data, in natural sort order of the keys; null keys form their own group.
#[instrument(skip(table), fields(rows = table.row_count()))]
pub fn aggregate(
    table: &DataTable,
    target_column: &str,
    group_by: &[&str],
) -> Result<AggregationResult> {
    let flags = read_target(table, target_column)?;
    let key_indices = group_by
        .iter()
        .map(|name| table.require_column(name))
        .collect::<Result<Vec<_>>>()?;

    if key_indices.is_empty() {
        if flags.is_empty() {
            return Err(UptakeError::DegenerateAggregation(
                "acceptance rate of an empty table is undefined".to_string(),
            ));
        }
        let accepted = flags.iter().filter(|&&f| f).count();
        return Ok(AggregationResult {
            group_columns: Vec::new(),
            rows: vec![RateRow::from_counts(Vec::new(), flags.len(), accepted)],
        });
    }

    let mut groups: BTreeMap<Vec<Value>, (usize, usize)> = BTreeMap::new();
    for (row, accepted) in table.rows().iter().zip(&flags) {
        let key: Vec<Value> = key_indices.iter().map(|&i| row[i].clone()).collect();
        let entry = groups.entry(key).or_insert((0, 0));
        entry.0 += 1;
        if *accepted {
            entry.1 += 1;
        }
    }

    debug!(groups = groups.len(), "aggregated acceptance rates");

    Ok(AggregationResult {
        group_columns: group_by.iter().map(|s| s.to_string()).collect(),
        rows: groups
            .into_iter()
            .map(|(key, (total, accepted))| RateRow::from_counts(key, total, accepted))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupons() -> DataTable {
        DataTable::from_columns(vec![
            ("coupon", vec![Value::from("A"), "A".into(), "B".into(), "B".into()]),
            ("Y", vec![Value::Int(1), Value::Int(0), Value::Int(1), Value::Int(1)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_grouped_rates() {
        let result = aggregate(&coupons(), "Y", &["coupon"]).unwrap();

        assert_eq!(result.len(), 2);
        let a = result.find_label(&["A"]).unwrap();
        assert_eq!((a.total, a.accepted, a.declined), (2, 1, 1));
        assert_eq!(a.acceptance_rate, 50.0);
        let b = result.find_label(&["B"]).unwrap();
        assert_eq!((b.total, b.accepted, b.declined), (2, 2, 0));
        assert_eq!(b.acceptance_rate, 100.0);
    }

    #[test]
    fn test_whole_table_rate() {
        let result = aggregate(&coupons(), "Y", &[]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0].total, 4);
        assert_eq!(result.rows[0].acceptance_rate, 75.0);
        assert!(result.rows[0].key.is_empty());
    }

    #[test]
    fn test_empty_table_without_grouping_is_degenerate() {
        let table = coupons().filter_rows(&[false; 4]).unwrap();
        let err = aggregate(&table, "Y", &[]).unwrap_err();
        assert!(matches!(err, UptakeError::DegenerateAggregation(_)));

        let grouped = aggregate(&table, "Y", &["coupon"]).unwrap();
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_missing_columns() {
        let err = aggregate(&coupons(), "accepted", &[]).unwrap_err();
        assert!(matches!(err, UptakeError::MissingColumn { ref column } if column == "accepted"));

        let err = aggregate(&coupons(), "Y", &["weather"]).unwrap_err();
        assert!(matches!(err, UptakeError::MissingColumn { ref column } if column == "weather"));
    }

    #[test]
    fn test_invalid_target_value() {
        let table = DataTable::from_columns(vec![("Y", vec![Value::Int(1), Value::Int(2)])]).unwrap();
        let err = aggregate(&table, "Y", &[]).unwrap_err();
        assert!(matches!(err, UptakeError::InvalidTargetValue { row: 1, .. }));
    }

    #[test]
    fn test_no_synthesized_combinations() {
        let table = DataTable::from_columns(vec![
            ("time", vec![Value::from("7AM"), "7AM".into(), "2PM".into()]),
            ("expiration", vec![Value::from("1d"), "2h".into(), "1d".into()]),
            ("Y", vec![Value::Int(1), Value::Int(0), Value::Int(0)]),
        ])
        .unwrap();

        let result = aggregate(&table, "Y", &["time", "expiration"]).unwrap();
        // 2PM x 2h never occurs and is not zero-filled
        assert_eq!(result.len(), 3);
        assert!(result.find_label(&["2PM", "2h"]).is_none());
        // Natural order of the key tuples
        let keys: Vec<String> = result
            .rows
            .iter()
            .map(|r| format!("{}/{}", r.key[0], r.key[1]))
            .collect();
        assert_eq!(keys, ["2PM/1d", "7AM/1d", "7AM/2h"]);
    }

    #[test]
    fn test_rate_rounding() {
        let row = RateRow::from_counts(Vec::new(), 3, 1);
        assert_eq!(row.acceptance_rate, 33.33);
        let row = RateRow::from_counts(Vec::new(), 3, 2);
        assert_eq!(row.acceptance_rate, 66.67);
    }

    #[test]
    fn test_sorted_by_order() {
        let table = DataTable::from_columns(vec![
            ("time", vec![Value::from("10PM"), "7AM".into(), "2PM".into(), "noon".into()]),
            ("Y", vec![Value::Int(1), Value::Int(0), Value::Int(0), Value::Int(1)]),
        ])
        .unwrap();
        let result = aggregate(&table, "Y", &["time"])
            .unwrap()
            .sorted_by_order("time", &CategoryOrder::time_of_day())
            .unwrap();
        let labels: Vec<String> = result.rows.iter().map(|r| r.key[0].label()).collect();
        assert_eq!(labels, ["7AM", "2PM", "10PM", "noon"]);
    }

    #[test]
    fn test_to_table_columns() {
        let table = aggregate(&coupons(), "Y", &["coupon"]).unwrap().to_table().unwrap();
        assert_eq!(
            table.headers(),
            ["coupon", "Total", "Accepted", "Declined", "AcceptanceRate"]
        );
        assert_eq!(table.get(1, 4), Some(&Value::Float(100.0)));
    }
}
