//! Uptake: acceptance-rate analytics for coupon offer data.
//!
//! Uptake loads a table of offer events (one row per coupon shown to a
//! driver, with a binary accepted/declined column) and answers questions
//! about it: how clean the data is, which groups accept most often, how a
//! segment compares with everyone else, and when offers work best.
//!
//! # Core Principles
//!
//! - **Non-destructive**: every operation returns a new result; input tables
//!   are never modified
//! - **Explicit target**: the accepted/declined column is configuration, not a
//!   hard-coded name
//! - **Deterministic**: orderings and tie-breaks are fixed, so the same input
//!   always yields the same output
//!
//! # Example
//!
//! ```no_run
//! use uptake::{Analyzer, Filter};
//!
//! let analyzer = Analyzer::new();
//! let (table, _source) = analyzer.load("in-vehicle-coupons.csv").unwrap();
//!
//! let rates = analyzer.rates(&table, &["coupon"]).unwrap();
//! for row in &rates.rows {
//!     println!("{}: {:.2}%", row.key[0], row.acceptance_rate);
//! }
//!
//! let filter = Filter::new().is_in("passanger", ["Alone"]);
//! let comparison = analyzer.compare_filter(&table, &filter).unwrap();
//! println!("Difference: {:+.2}", comparison.rate_difference());
//! ```

pub mod aggregate;
pub mod bucket;
pub mod config;
pub mod encoding;
pub mod error;
pub mod input;
pub mod profile;
pub mod quality;
pub mod schema;
pub mod segment;
pub mod time;

mod analyzer;

pub use crate::analyzer::Analyzer;
pub use aggregate::{
    aggregate, crosstab, AggregationResult, CategoryOrder, CrossTab, CrossTabCell, RateRow,
};
pub use bucket::{bucketize, with_bucket_column, Buckets, UNKNOWN_BUCKET};
pub use config::{
    AnalysisConfig, Labels, ProfileColumns, QualityThresholds, TimeAxes, DEFAULT_TARGET_COLUMN,
};
pub use encoding::{encode_categorical, mapping_table, EncodedTable, ValueMapping};
pub use error::{Result, UptakeError};
pub use input::{DataTable, Parser, ParserConfig, RowView, SourceMetadata, Value};
pub use profile::{coupon_profile, overview, CouponProfile, Overview};
pub use quality::{
    column_summary, handle_missing, inspect, summary_table, ColumnSummary, MissingOutcome,
    MissingStrategy, QualityReport, Severity,
};
pub use schema::ColumnType;
pub use segment::{compare, ComparisonResult, Condition, Filter, Segment, SegmentStats};
pub use time::{analyze_time_patterns, best_times_by_coupon, CouponTiming, TimePatterns};
