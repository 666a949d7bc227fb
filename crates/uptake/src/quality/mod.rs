//! Data-quality inspection and missing-data handling.

mod missing;
mod report;
mod summary;

pub use missing::{handle_missing, MissingOutcome, MissingStrategy, DEFAULT_MISSING_THRESHOLD};
pub use report::{inspect, ColumnNulls, IssueKind, QualityIssue, QualityReport, Severity};
pub use summary::{column_summary, summary_table, ColumnSummary};
