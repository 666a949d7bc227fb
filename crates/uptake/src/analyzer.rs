//! Main Analyzer struct and public API.

use std::path::Path;

use tracing::info;

use crate::aggregate::{self, AggregationResult, CrossTab};
use crate::bucket::{self, Buckets};
use crate::config::AnalysisConfig;
use crate::encoding::{self, EncodedTable};
use crate::error::Result;
use crate::input::{DataTable, Parser, SourceMetadata};
use crate::profile::{self, CouponProfile, Overview};
use crate::quality::{self, ColumnSummary, MissingOutcome, MissingStrategy, QualityReport};
use crate::segment::{self, ComparisonResult, Filter, Segment};
use crate::time::{self, CouponTiming, TimePatterns};

/// Entry point tying a configuration to the analysis operations.
///
/// Every method is a pure function of its arguments and the configuration;
/// the target column and labels come from [`AnalysisConfig`].
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    parser: Parser,
}

impl Analyzer {
    /// Create an analyzer with default configuration.
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    /// Create an analyzer with custom configuration.
    pub fn with_config(config: AnalysisConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self { config, parser }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Name of the accepted/declined column.
    pub fn target_column(&self) -> &str {
        &self.config.target_column
    }

    /// Load a CSV/TSV file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let (table, source) = self.parser.parse_file(path)?;
        info!(
            file = %source.file,
            rows = source.row_count,
            columns = source.column_count,
            "loaded data"
        );
        Ok((table, source))
    }

    /// Validate the table against the configured null thresholds.
    pub fn inspect(&self, table: &DataTable, required_columns: &[&str]) -> Result<QualityReport> {
        quality::inspect(table, required_columns, &self.config.quality)
    }

    pub fn column_summary(&self, table: &DataTable) -> Vec<ColumnSummary> {
        quality::column_summary(table)
    }

    pub fn handle_missing(
        &self,
        table: &DataTable,
        strategy: &MissingStrategy,
    ) -> Result<MissingOutcome> {
        quality::handle_missing(table, strategy)
    }

    pub fn encode(&self, table: &DataTable) -> Result<EncodedTable> {
        encoding::encode_categorical(table)
    }

    /// Acceptance rates, overall or grouped.
    pub fn rates(&self, table: &DataTable, group_by: &[&str]) -> Result<AggregationResult> {
        aggregate::aggregate(table, self.target_column(), group_by)
    }

    pub fn crosstab(
        &self,
        table: &DataTable,
        row_column: &str,
        column_column: &str,
    ) -> Result<CrossTab> {
        aggregate::crosstab(table, row_column, column_column, self.target_column())
    }

    /// Compare a segment against the rest of the table.
    pub fn compare(&self, table: &DataTable, segment: &Segment) -> Result<ComparisonResult> {
        let labels = &self.config.labels;
        segment::compare(
            table,
            segment,
            self.target_column(),
            (labels.target_segment.as_str(), labels.others_segment.as_str()),
        )
    }

    /// Compare the rows matching `filter` against the rest.
    pub fn compare_filter(&self, table: &DataTable, filter: &Filter) -> Result<ComparisonResult> {
        let segment = Segment::from_filter(table, filter)?;
        self.compare(table, &segment)
    }

    /// Bucket labels for `column`, with unmatched values labelled per the
    /// configuration.
    pub fn bucketize(
        &self,
        table: &DataTable,
        column: &str,
        buckets: &Buckets,
    ) -> Result<Vec<String>> {
        bucket::bucketize(table, column, &self.configured_buckets(buckets))
    }

    /// Copy of `table` with the bucket labels of `column` appended as
    /// `new_column`.
    pub fn with_bucket_column(
        &self,
        table: &DataTable,
        column: &str,
        new_column: &str,
        buckets: &Buckets,
    ) -> Result<DataTable> {
        bucket::with_bucket_column(table, column, new_column, &self.configured_buckets(buckets))
    }

    fn configured_buckets(&self, buckets: &Buckets) -> Buckets {
        buckets
            .clone()
            .with_unknown_label(&self.config.labels.unknown_bucket)
    }

    pub fn time_patterns(
        &self,
        table: &DataTable,
        coupon_type: Option<&str>,
    ) -> Result<TimePatterns> {
        time::analyze_time_patterns(table, coupon_type, &self.config.time, self.target_column())
    }

    pub fn best_times_by_coupon(&self, table: &DataTable) -> Result<Vec<CouponTiming>> {
        time::best_times_by_coupon(table, &self.config.time, self.target_column())
    }

    pub fn overview(&self, table: &DataTable) -> Result<Overview> {
        profile::overview(table, self.target_column())
    }

    pub fn coupon_profile(&self, table: &DataTable, coupon_type: &str) -> Result<CouponProfile> {
        profile::coupon_profile(
            table,
            coupon_type,
            &self.config.profile,
            self.target_column(),
        )
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Value;

    fn table() -> DataTable {
        DataTable::from_columns(vec![
            ("coupon", vec!["Bar", "Bar", "Coffee House", "Coffee House"]),
            ("time", vec!["7AM", "2PM", "7AM", "10PM"]),
            ("expiration", vec!["1d", "2h", "1d", "1d"]),
            ("accepted", vec!["1", "0", "1", "1"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_target_column_threaded_through() {
        let analyzer = Analyzer::with_config(AnalysisConfig::new().with_target_column("accepted"));
        let rates = analyzer.rates(&table(), &["coupon"]).unwrap();
        assert_eq!(rates.find_label(&["Bar"]).unwrap().acceptance_rate, 50.0);
        assert_eq!(analyzer.overview(&table()).unwrap().accepted, 3);

        let default = Analyzer::new();
        assert!(default.rates(&table(), &["coupon"]).is_err());
    }

    #[test]
    fn test_compare_uses_configured_labels() {
        let analyzer = Analyzer::with_config(AnalysisConfig::new().with_target_column("accepted"));
        let filter = Filter::new().is_in("coupon", ["Bar"]);
        let result = analyzer.compare_filter(&table(), &filter).unwrap();
        assert_eq!(result.target.segment, "Target Segment");
        assert_eq!(result.others.segment, "All Others");
        assert_eq!(result.rate_difference(), -50.0);
    }

    #[test]
    fn test_bucketize_uses_configured_unknown_label() {
        let mut config = AnalysisConfig::new();
        config.labels.unknown_bucket = "Other".to_string();
        let analyzer = Analyzer::with_config(config);
        let buckets = Buckets::new().with_bucket("Morning", ["7AM", "10AM"]);
        let labels = analyzer.bucketize(&table(), "time", &buckets).unwrap();
        assert_eq!(labels, ["Morning", "Other", "Morning", "Other"]);

        let with_segment = analyzer
            .with_bucket_column(&table(), "time", "timeSegment", &buckets)
            .unwrap();
        let index = with_segment.column_index("timeSegment").unwrap();
        let column: Vec<String> = with_segment.column_values(index).map(Value::label).collect();
        assert_eq!(column, labels);
    }

    #[test]
    fn test_time_patterns() {
        let analyzer = Analyzer::with_config(AnalysisConfig::new().with_target_column("accepted"));
        let patterns = analyzer.time_patterns(&table(), None).unwrap();
        assert_eq!(patterns.best.unwrap().time, "7AM");
        assert_eq!(patterns.worst.unwrap().time, "2PM");
        assert_eq!(patterns.matrix.cell("7AM", "1d"), Some(100.0));

        let encoded = analyzer.encode(&table()).unwrap();
        assert_eq!(encoded.table.get(0, 0), Some(&Value::Int(1)));
    }
}
