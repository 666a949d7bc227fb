//! Acceptance by time of day and coupon expiration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::aggregate::{
    aggregate, crosstab, read_target, round_rate, AggregationResult, CategoryOrder, CrossTab,
};
use crate::config::TimeAxes;
use crate::error::Result;
use crate::input::DataTable;

/// Counts and rate for one canonical time-of-day bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub time: String,
    pub total: usize,
    pub accepted: usize,
    /// `None` when no row falls in the bucket.
    pub acceptance_rate: Option<f64>,
}

/// A time bucket paired with its acceptance rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRate {
    pub time: String,
    pub acceptance_rate: f64,
}

/// Outcome of [`analyze_time_patterns`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePatterns {
    /// Coupon type the rows were restricted to, if any.
    pub coupon_type: Option<String>,
    /// Rows left after the coupon filter.
    pub rows: usize,
    /// One entry per canonical bucket, in canonical order.
    pub by_time: Vec<TimeBucket>,
    pub by_expiration: AggregationResult,
    /// Time × expiration rates, rows in canonical time order.
    pub matrix: CrossTab,
    pub best: Option<TimeRate>,
    pub worst: Option<TimeRate>,
}

impl TimePatterns {
    /// Bucket entry for a time label.
    pub fn bucket(&self, time: &str) -> Option<&TimeBucket> {
        self.by_time.iter().find(|b| b.time == time)
    }
}

/// Best and worst time per coupon type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponTiming {
    pub coupon: String,
    pub best: Option<TimeRate>,
    pub worst: Option<TimeRate>,
}

fn restrict_to_coupon(table: &DataTable, column: &str, coupon: &str) -> Result<DataTable> {
    let index = table.require_column(column)?;
    let mask: Vec<bool> = table
        .column_values(index)
        .map(|v| !v.is_null() && v.label() == coupon)
        .collect();
    table.filter_rows(&mask)
}

/// Extremes over observed buckets; ties keep the bucket seen first.
fn extremes(counts: &IndexMap<String, (usize, usize)>) -> (Option<TimeRate>, Option<TimeRate>) {
    let mut best: Option<TimeRate> = None;
    let mut worst: Option<TimeRate> = None;

    for (time, &(total, accepted)) in counts {
        let rate = round_rate(accepted as f64 / total as f64 * 100.0);
        if best.as_ref().is_none_or(|b| rate > b.acceptance_rate) {
            best = Some(TimeRate {
                time: time.clone(),
                acceptance_rate: rate,
            });
        }
        if worst.as_ref().is_none_or(|w| rate < w.acceptance_rate) {
            worst = Some(TimeRate {
                time: time.clone(),
                acceptance_rate: rate,
            });
        }
    }
    (best, worst)
}

/// Break acceptance down by time of day and expiration.
///
/// With `coupon_type` set, only rows of that coupon type are considered.
/// A filter that leaves no rows is not an error: every bucket then has a
/// missing rate and there is no best or worst time.
#[instrument(skip(table, axes), fields(rows = table.row_count()))]
pub fn analyze_time_patterns(
    table: &DataTable,
    coupon_type: Option<&str>,
    axes: &TimeAxes,
    target_column: &str,
) -> Result<TimePatterns> {
    let filtered = match coupon_type {
        Some(coupon) => restrict_to_coupon(table, &axes.coupon_column, coupon)?,
        None => table.clone(),
    };

    let flags = read_target(&filtered, target_column)?;
    let time_index = filtered.require_column(&axes.time_column)?;
    filtered.require_column(&axes.expiration_column)?;

    // Observed buckets in order of first appearance
    let mut counts: IndexMap<String, (usize, usize)> = IndexMap::new();
    for (value, &accepted) in filtered.column_values(time_index).zip(&flags) {
        if value.is_null() {
            continue;
        }
        let entry = counts.entry(value.label()).or_insert((0, 0));
        entry.0 += 1;
        if accepted {
            entry.1 += 1;
        }
    }

    let by_time = axes
        .time_order
        .iter()
        .map(|time| match counts.get(time) {
            Some(&(total, accepted)) => TimeBucket {
                time: time.clone(),
                total,
                accepted,
                acceptance_rate: Some(round_rate(accepted as f64 / total as f64 * 100.0)),
            },
            None => TimeBucket {
                time: time.clone(),
                total: 0,
                accepted: 0,
                acceptance_rate: None,
            },
        })
        .collect();

    let (best, worst) = extremes(&counts);
    let by_expiration = aggregate(
        &filtered,
        target_column,
        &[axes.expiration_column.as_str()],
    )?;
    let matrix = crosstab(
        &filtered,
        &axes.time_column,
        &axes.expiration_column,
        target_column,
    )?
    .reindex_rows(&CategoryOrder::new(axes.time_order.iter().cloned()));

    debug!(
        observed = counts.len(),
        best = best.as_ref().map(|b| b.time.as_str()),
        "analyzed time patterns"
    );

    Ok(TimePatterns {
        coupon_type: coupon_type.map(str::to_string),
        rows: filtered.row_count(),
        by_time,
        by_expiration,
        matrix,
        best,
        worst,
    })
}

/// Best and worst time for every coupon type, in order of first appearance.
#[instrument(skip(table, axes), fields(rows = table.row_count()))]
pub fn best_times_by_coupon(
    table: &DataTable,
    axes: &TimeAxes,
    target_column: &str,
) -> Result<Vec<CouponTiming>> {
    let index = table.require_column(&axes.coupon_column)?;
    let mut coupons: Vec<String> = Vec::new();
    for value in table.column_values(index).filter(|v| !v.is_null()) {
        let label = value.label();
        if !coupons.contains(&label) {
            coupons.push(label);
        }
    }

    coupons
        .into_iter()
        .map(|coupon| {
            let patterns = analyze_time_patterns(table, Some(&coupon), axes, target_column)?;
            Ok(CouponTiming {
                coupon,
                best: patterns.best,
                worst: patterns.worst,
            })
        })
        .collect()
}
