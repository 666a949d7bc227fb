//! Headline metrics and per-coupon-type profiles.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::aggregate::{aggregate, read_target, round_rate, AggregationResult, CategoryOrder};
use crate::config::ProfileColumns;
use crate::error::Result;
use crate::input::DataTable;

/// Whole-table acceptance counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total: usize,
    pub accepted: usize,
    pub declined: usize,
    /// `None` for an empty table.
    pub acceptance_rate: Option<f64>,
}

/// Headline acceptance counts of a table.
#[instrument(skip(table), fields(rows = table.row_count()))]
pub fn overview(table: &DataTable, target_column: &str) -> Result<Overview> {
    let flags = read_target(table, target_column)?;
    let total = flags.len();
    let accepted = flags.iter().filter(|&&f| f).count();
    Ok(Overview {
        total,
        accepted,
        declined: total - accepted,
        acceptance_rate: (total > 0).then(|| round_rate(accepted as f64 / total as f64 * 100.0)),
    })
}

/// Visit-frequency column describing how often a driver goes to the venue a
/// coupon type is for.
pub fn frequency_column_for_coupon(coupon_type: &str) -> Option<&'static str> {
    match coupon_type {
        "Bar" => Some("Bar"),
        "Coffee House" => Some("CoffeeHouse"),
        "Carry out & Take away" => Some("CarryAway"),
        "Restaurant(<20)" => Some("RestaurantLessThan20"),
        "Restaurant(20-50)" => Some("Restaurant20To50"),
        _ => None,
    }
}

/// Acceptance detail for a single coupon type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponProfile {
    pub coupon_type: String,
    pub overview: Overview,
    /// Coupon rate minus the whole-table rate, in percentage points.
    pub rate_delta: Option<f64>,
    /// Frequency column used for `by_frequency`, when the coupon type has one.
    pub frequency_column: Option<String>,
    /// Rates per visit frequency, in canonical frequency order.
    pub by_frequency: Option<AggregationResult>,
    /// Rates per age group, in canonical age order.
    pub by_age: Option<AggregationResult>,
    /// Rates per further attribute, highest rate first.
    pub breakdowns: IndexMap<String, AggregationResult>,
}

/// Profile acceptance for one coupon type.
///
/// Breakdowns are computed only for columns the table has.
#[instrument(skip(table, columns), fields(rows = table.row_count()))]
pub fn coupon_profile(
    table: &DataTable,
    coupon_type: &str,
    columns: &ProfileColumns,
    target_column: &str,
) -> Result<CouponProfile> {
    let overall = overview(table, target_column)?;
    let index = table.require_column(&columns.coupon_column)?;
    let mask: Vec<bool> = table
        .column_values(index)
        .map(|v| !v.is_null() && v.label() == coupon_type)
        .collect();
    let coupon_rows = table.filter_rows(&mask)?;
    let coupon = overview(&coupon_rows, target_column)?;

    let rate_delta = match (coupon.acceptance_rate, overall.acceptance_rate) {
        (Some(rate), Some(base)) => Some(round_rate(rate - base)),
        _ => None,
    };

    let frequency_column = frequency_column_for_coupon(coupon_type)
        .filter(|column| coupon_rows.has_column(column))
        .map(str::to_string);
    let by_frequency = match &frequency_column {
        Some(column) => Some(
            aggregate(&coupon_rows, target_column, &[column.as_str()])?.sorted_by_order(
                column,
                &CategoryOrder::new(columns.frequency_order.iter().cloned()),
            )?,
        ),
        None => None,
    };

    let by_age = if coupon_rows.has_column(&columns.age_column) {
        Some(
            aggregate(&coupon_rows, target_column, &[columns.age_column.as_str()])?
                .sorted_by_order(
                    &columns.age_column,
                    &CategoryOrder::new(columns.age_order.iter().cloned()),
                )?,
        )
    } else {
        None
    };

    let mut breakdowns = IndexMap::new();
    for column in &columns.breakdown_columns {
        if coupon_rows.has_column(column) {
            let result =
                aggregate(&coupon_rows, target_column, &[column.as_str()])?.sorted_by_rate(true);
            breakdowns.insert(column.clone(), result);
        }
    }

    debug!(
        coupon_type,
        rows = coupon.total,
        breakdowns = breakdowns.len(),
        "profiled coupon type"
    );

    Ok(CouponProfile {
        coupon_type: coupon_type.to_string(),
        overview: coupon,
        rate_delta,
        frequency_column,
        by_frequency,
        by_age,
        breakdowns,
    })
}
