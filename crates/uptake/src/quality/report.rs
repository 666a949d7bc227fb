//! Null-rate and required-column validation.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::aggregate::round_rate;
use crate::config::QualityThresholds;
use crate::error::{Result, UptakeError};
use crate::input::DataTable;

/// Severity level of a quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Potential issue that should be reviewed.
    Warning,
    /// Definite issue that should be addressed.
    Error,
}

/// Kind of quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Null percentage above a threshold.
    HighNullRate,
    /// A column the caller declared required is absent.
    MissingRequiredColumn,
}

/// A single finding of the inspector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub column: String,
    pub message: String,
    /// Null percentage for null-rate issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_percentage: Option<f64>,
}

/// Null statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNulls {
    pub column: String,
    pub null_count: usize,
    /// Percentage of null cells, rounded to 2 decimals.
    pub null_percentage: f64,
}

/// Outcome of [`inspect`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub row_count: usize,
    pub column_count: usize,
    /// Rows identical to an earlier row.
    pub duplicate_rows: usize,
    /// Approximate in-memory size of the table.
    pub memory_bytes: usize,
    pub columns: Vec<ColumnNulls>,
    pub missing_required: Vec<String>,
    pub warnings: Vec<QualityIssue>,
    pub errors: Vec<QualityIssue>,
    /// False iff a required column is missing.
    pub is_valid: bool,
}

impl QualityReport {
    /// Null statistics for a column.
    pub fn nulls(&self, column: &str) -> Option<&ColumnNulls> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn has_warning_for(&self, column: &str) -> bool {
        self.warnings.iter().any(|w| w.column == column)
    }

    pub fn has_error_for(&self, column: &str) -> bool {
        self.errors.iter().any(|e| e.column == column)
    }
}

/// Validate a table against required columns and null-rate thresholds.
///
/// The two thresholds are checked independently, so a very sparse column is
/// reported as both a warning and an error. Only missing required columns
/// make the report invalid.
#[instrument(skip(table), fields(rows = table.row_count(), columns = table.column_count()))]
pub fn inspect(
    table: &DataTable,
    required_columns: &[&str],
    thresholds: &QualityThresholds,
) -> Result<QualityReport> {
    for pct in [thresholds.warning_null_pct, thresholds.error_null_pct] {
        if !(0.0..=100.0).contains(&pct) {
            return Err(UptakeError::InvalidInput(format!(
                "null thresholds must be within 0-100, got {}",
                pct
            )));
        }
    }

    let row_count = table.row_count();
    let mut columns = Vec::with_capacity(table.column_count());
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    for (index, name) in table.headers().iter().enumerate() {
        let null_count = table.column_values(index).filter(|v| v.is_null()).count();
        let pct = if row_count == 0 {
            0.0
        } else {
            null_count as f64 * 100.0 / row_count as f64
        };

        let issue = |severity| QualityIssue {
            kind: IssueKind::HighNullRate,
            severity,
            column: name.clone(),
            message: format!("{:.1}% of values are missing", pct),
            null_percentage: Some(round_rate(pct)),
        };
        if pct > thresholds.warning_null_pct {
            warnings.push(issue(Severity::Warning));
        }
        if pct > thresholds.error_null_pct {
            errors.push(issue(Severity::Error));
        }

        columns.push(ColumnNulls {
            column: name.clone(),
            null_count,
            null_percentage: round_rate(pct),
        });
    }

    let missing_required: Vec<String> = required_columns
        .iter()
        .filter(|name| !table.has_column(name))
        .map(|name| name.to_string())
        .collect();
    for name in &missing_required {
        errors.push(QualityIssue {
            kind: IssueKind::MissingRequiredColumn,
            severity: Severity::Error,
            column: name.clone(),
            message: format!("required column '{}' is missing", name),
            null_percentage: None,
        });
    }

    debug!(
        warnings = warnings.len(),
        errors = errors.len(),
        "inspected table"
    );

    Ok(QualityReport {
        row_count,
        column_count: table.column_count(),
        duplicate_rows: table.duplicate_row_count(),
        memory_bytes: table.memory_usage(),
        columns,
        is_valid: missing_required.is_empty(),
        missing_required,
        warnings,
        errors,
    })
}
