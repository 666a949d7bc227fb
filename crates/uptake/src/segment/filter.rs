//! Row filters built from simple column conditions.

use serde::{Deserialize, Serialize};

use crate::error::{Result, UptakeError};
use crate::input::{DataTable, Value};

/// A condition on a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// Cell's text form is one of `values`. An empty list matches nothing.
    IsIn { column: String, values: Vec<String> },
    /// Numeric cell within `[min, max]`. Non-numeric cells never match.
    Between { column: String, min: f64, max: f64 },
}

impl Condition {
    pub fn column(&self) -> &str {
        match self {
            Condition::IsIn { column, .. } | Condition::Between { column, .. } => column,
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Condition::IsIn { values, .. } => {
                !value.is_null() && values.iter().any(|v| *v == value.label())
            }
            Condition::Between { min, max, .. } => value
                .as_f64()
                .is_some_and(|x| *min <= x && x <= *max),
        }
    }
}

/// Conjunction of conditions. An empty filter keeps every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the column's value to be one of `values`.
    pub fn is_in<I, S>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.push(Condition::IsIn {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Require the column's numeric value to lie in `[min, max]`.
    pub fn between(mut self, column: impl Into<String>, min: f64, max: f64) -> Self {
        self.conditions.push(Condition::Between {
            column: column.into(),
            min,
            max,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate the filter into a row mask.
    pub fn mask(&self, table: &DataTable) -> Result<Vec<bool>> {
        let resolved = self
            .conditions
            .iter()
            .map(|cond| {
                if let Condition::Between { min, max, column } = cond {
                    if min > max {
                        return Err(UptakeError::InvalidInput(format!(
                            "range for '{}' has min {} above max {}",
                            column, min, max
                        )));
                    }
                }
                Ok((table.require_column(cond.column())?, cond))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(table
            .rows()
            .iter()
            .map(|row| resolved.iter().all(|(idx, cond)| cond.matches(&row[*idx])))
            .collect())
    }

    /// New table with only the matching rows.
    pub fn apply(&self, table: &DataTable) -> Result<DataTable> {
        let mask = self.mask(table)?;
        table.filter_rows(&mask)
    }
}
