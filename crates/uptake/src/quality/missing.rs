//! Missing-data handling strategies.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, UptakeError};
use crate::input::{DataTable, Value};

/// Null fraction used when a strategy name is given without a threshold.
pub const DEFAULT_MISSING_THRESHOLD: f64 = 0.5;

/// How to treat null cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum MissingStrategy {
    /// Count nulls per column; the table is not touched.
    Report,
    /// Drop columns whose null fraction exceeds `threshold`.
    DropColumns { threshold: f64 },
    /// Drop rows whose non-null fraction is below `1 - threshold`.
    DropRows { threshold: f64 },
    /// Replace nulls in the listed columns; other columns are untouched.
    Fill { values: IndexMap<String, Value> },
}

impl MissingStrategy {
    /// Build a strategy from its name.
    ///
    /// `threshold` applies to the drop strategies and `fill_values` to
    /// `fill`. Unrecognized names fail with [`UptakeError::UnknownStrategy`].
    pub fn from_name(
        name: &str,
        threshold: f64,
        fill_values: IndexMap<String, Value>,
    ) -> Result<Self> {
        match name {
            "report" => Ok(MissingStrategy::Report),
            "drop_columns" => Ok(MissingStrategy::DropColumns { threshold }),
            "drop_rows" => Ok(MissingStrategy::DropRows { threshold }),
            "fill" => Ok(MissingStrategy::Fill {
                values: fill_values,
            }),
            other => Err(UptakeError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Result of applying a [`MissingStrategy`].
#[derive(Debug, Clone, PartialEq)]
pub enum MissingOutcome {
    /// Column name → null count, in column order.
    Report(IndexMap<String, usize>),
    /// The transformed table.
    Table(DataTable),
}

impl MissingOutcome {
    /// The table, for the strategies that produce one.
    pub fn into_table(self) -> Option<DataTable> {
        match self {
            MissingOutcome::Table(table) => Some(table),
            MissingOutcome::Report(_) => None,
        }
    }
}

fn check_fraction(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(UptakeError::InvalidInput(format!(
            "threshold must be a fraction within 0-1, got {}",
            threshold
        )));
    }
    Ok(())
}

/// Apply a missing-data strategy, returning a report or a new table.
pub fn handle_missing(table: &DataTable, strategy: &MissingStrategy) -> Result<MissingOutcome> {
    let rows = table.row_count();
    let cols = table.column_count();
    let null_count = |index: usize| table.column_values(index).filter(|v| v.is_null()).count();

    match strategy {
        MissingStrategy::Report => Ok(MissingOutcome::Report(
            table
                .headers()
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), null_count(i)))
                .collect(),
        )),

        MissingStrategy::DropColumns { threshold } => {
            check_fraction(*threshold)?;
            let dropped: Vec<&str> = table
                .headers()
                .iter()
                .enumerate()
                .filter(|(i, _)| rows > 0 && null_count(*i) as f64 / rows as f64 > *threshold)
                .map(|(_, name)| name.as_str())
                .collect();
            debug!(?dropped, "dropping sparse columns");
            Ok(MissingOutcome::Table(table.without_columns(&dropped)))
        }

        MissingStrategy::DropRows { threshold } => {
            check_fraction(*threshold)?;
            let min_fraction = 1.0 - threshold;
            let mask: Vec<bool> = table
                .rows()
                .iter()
                .map(|row| {
                    if cols == 0 {
                        return true;
                    }
                    let present = row.iter().filter(|v| !v.is_null()).count();
                    present as f64 / cols as f64 >= min_fraction
                })
                .collect();
            debug!(
                dropped = mask.iter().filter(|keep| !**keep).count(),
                "dropping sparse rows"
            );
            Ok(MissingOutcome::Table(table.filter_rows(&mask)?))
        }

        MissingStrategy::Fill { values } => {
            let mut filled = table.clone();
            for (column, fill) in values {
                let index = table.require_column(column)?;
                let replaced: Vec<Value> = filled
                    .column_values(index)
                    .map(|v| if v.is_null() { fill.clone() } else { v.clone() })
                    .collect();
                filled = filled.replace_column(index, replaced);
            }
            Ok(MissingOutcome::Table(filled))
        }
    }
}
