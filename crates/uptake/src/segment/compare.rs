//! Target-versus-complement segment comparison.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::aggregate::{
    read_target, round_rate, RateRow, ACCEPTANCE_RATE, ACCEPTED, DECLINED, TOTAL,
};
use crate::error::{Result, UptakeError};
use crate::input::{DataTable, RowView, Value};

use super::filter::Filter;

/// Output column naming the segment of a comparison row.
pub const SEGMENT: &str = "Segment";
/// Output column holding `own rate - other rate`.
pub const RATE_DIFFERENCE: &str = "RateDifference";

/// A boolean selection of rows. The rows not selected form its complement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    mask: Vec<bool>,
}

impl Segment {
    /// Use an explicit row mask; it must have one entry per row.
    pub fn from_mask(table: &DataTable, mask: Vec<bool>) -> Result<Self> {
        if mask.len() != table.row_count() {
            return Err(UptakeError::InvalidInput(format!(
                "segment mask has {} entries, table has {} rows",
                mask.len(),
                table.row_count()
            )));
        }
        Ok(Self { mask })
    }

    /// Select the rows for which `predicate` holds.
    pub fn from_predicate<F>(table: &DataTable, predicate: F) -> Self
    where
        F: Fn(&RowView<'_>) -> bool,
    {
        Self {
            mask: table.iter_rows().map(|row| predicate(&row)).collect(),
        }
    }

    /// Select the rows matching a filter.
    pub fn from_filter(table: &DataTable, filter: &Filter) -> Result<Self> {
        Ok(Self {
            mask: filter.mask(table)?,
        })
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Number of selected rows.
    pub fn selected(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// The exact complement of this segment.
    pub fn complement(&self) -> Self {
        Self {
            mask: self.mask.iter().map(|m| !m).collect(),
        }
    }
}

/// Statistics for one side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub segment: String,
    pub total: usize,
    pub accepted: usize,
    pub declined: usize,
    /// Zero when the segment has no rows.
    pub acceptance_rate: f64,
    /// This segment's rate minus the other segment's rate.
    pub rate_difference: f64,
}

/// Target segment and its complement, side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub target: SegmentStats,
    pub others: SegmentStats,
}

impl ComparisonResult {
    /// Target rate minus others rate.
    pub fn rate_difference(&self) -> f64 {
        self.target.rate_difference
    }

    /// Both rows, target first.
    pub fn rows(&self) -> [&SegmentStats; 2] {
        [&self.target, &self.others]
    }

    /// Render as a two-row table with columns
    /// `{Segment, Total, Accepted, Declined, AcceptanceRate, RateDifference}`.
    pub fn to_table(&self) -> Result<DataTable> {
        let headers = [SEGMENT, TOTAL, ACCEPTED, DECLINED, ACCEPTANCE_RATE, RATE_DIFFERENCE]
            .map(String::from)
            .to_vec();
        let rows = self
            .rows()
            .iter()
            .map(|s| {
                vec![
                    Value::from(s.segment.as_str()),
                    Value::Int(s.total as i64),
                    Value::Int(s.accepted as i64),
                    Value::Int(s.declined as i64),
                    Value::Float(s.acceptance_rate),
                    Value::Float(s.rate_difference),
                ]
            })
            .collect();
        DataTable::new(headers, rows)
    }
}

/// Compare acceptance between a segment and its complement.
///
/// The two sides partition the table, so their totals always add up to the
/// row count. A side with no rows reports a rate of 0.
#[instrument(skip(table, segment), fields(rows = table.row_count(), selected = segment.selected()))]
pub fn compare(
    table: &DataTable,
    segment: &Segment,
    target_column: &str,
    labels: (&str, &str),
) -> Result<ComparisonResult> {
    let flags = read_target(table, target_column)?;
    if segment.mask.len() != flags.len() {
        return Err(UptakeError::InvalidInput(format!(
            "segment mask has {} entries, table has {} rows",
            segment.mask.len(),
            flags.len()
        )));
    }

    let (mut in_total, mut in_accepted, mut out_accepted) = (0, 0, 0);
    for (&selected, &accepted) in segment.mask.iter().zip(&flags) {
        match (selected, accepted) {
            (true, true) => {
                in_total += 1;
                in_accepted += 1;
            }
            (true, false) => in_total += 1,
            (false, true) => out_accepted += 1,
            (false, false) => {}
        }
    }
    let target = RateRow::from_counts(Vec::new(), in_total, in_accepted);
    let others = RateRow::from_counts(Vec::new(), flags.len() - in_total, out_accepted);

    let difference = round_rate(target.acceptance_rate - others.acceptance_rate);
    debug!(difference, "compared segments");

    let stats = |label: &str, row: RateRow, rate_difference: f64| SegmentStats {
        segment: label.to_string(),
        total: row.total,
        accepted: row.accepted,
        declined: row.declined,
        acceptance_rate: row.acceptance_rate,
        rate_difference,
    };

    Ok(ComparisonResult {
        target: stats(labels.0, target, difference),
        others: stats(labels.1, others, 0.0 - difference),
    })
}
