//! Analysis configuration threaded through every engine call.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregate::{AGE_ORDER, TIME_OF_DAY_ORDER, VISIT_FREQUENCY_ORDER};
use crate::error::{Result, UptakeError};
use crate::input::ParserConfig;

/// Conventional name of the accepted/declined indicator column.
pub const DEFAULT_TARGET_COLUMN: &str = "Y";

/// Null-rate thresholds used by the quality inspector, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Null percentage above which a column gets a warning.
    pub warning_null_pct: f64,
    /// Null percentage above which a column gets an error.
    pub error_null_pct: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            warning_null_pct: 50.0,
            error_null_pct: 90.0,
        }
    }
}

/// Column names and canonical orders used by the time-pattern analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeAxes {
    pub time_column: String,
    pub expiration_column: String,
    pub coupon_column: String,
    /// Display order of time-of-day buckets.
    pub time_order: Vec<String>,
}

impl Default for TimeAxes {
    fn default() -> Self {
        Self {
            time_column: "time".to_string(),
            expiration_column: "expiration".to_string(),
            coupon_column: "coupon".to_string(),
            time_order: TIME_OF_DAY_ORDER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Labels used when rendering segment and bucket results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Label of the predicate-true segment.
    pub target_segment: String,
    /// Label of the complement segment.
    pub others_segment: String,
    /// Label for values no bucket claims.
    pub unknown_bucket: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            target_segment: "Target Segment".to_string(),
            others_segment: "All Others".to_string(),
            unknown_bucket: crate::bucket::UNKNOWN_BUCKET.to_string(),
        }
    }
}

/// Columns and orders used by the coupon profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileColumns {
    pub coupon_column: String,
    pub age_column: String,
    /// Further attributes broken down by rate, highest first.
    pub breakdown_columns: Vec<String>,
    /// Display order of visit-frequency labels.
    pub frequency_order: Vec<String>,
    /// Display order of age groups.
    pub age_order: Vec<String>,
}

impl Default for ProfileColumns {
    fn default() -> Self {
        Self {
            coupon_column: "coupon".to_string(),
            age_column: "age".to_string(),
            breakdown_columns: ["gender", "income", "passanger", "destination"]
                .map(String::from)
                .to_vec(),
            frequency_order: VISIT_FREQUENCY_ORDER.iter().map(|s| s.to_string()).collect(),
            age_order: AGE_ORDER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Configuration for an [`Analyzer`](crate::Analyzer).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Name of the binary accepted/declined column.
    pub target_column: String,
    /// Loader configuration.
    pub parser: ParserConfig,
    /// Quality inspector thresholds.
    pub quality: QualityThresholds,
    /// Time-pattern columns and order.
    pub time: TimeAxes,
    /// Segment and bucket labels.
    pub labels: Labels,
    /// Coupon profile columns and orders.
    pub profile: ProfileColumns,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            parser: ParserConfig::default(),
            quality: QualityThresholds::default(),
            time: TimeAxes::default(),
            labels: Labels::default(),
            profile: ProfileColumns::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target column.
    pub fn with_target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = column.into();
        self
    }

    /// Set the quality thresholds.
    pub fn with_quality_thresholds(mut self, thresholds: QualityThresholds) -> Self {
        self.quality = thresholds;
        self
    }

    /// Drop these columns when loading files.
    pub fn with_dropped_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parser.drop_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| UptakeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AnalysisConfig =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                UptakeError::Config(format!(
                    "Failed to parse config '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.target_column.trim().is_empty() {
            return Err(UptakeError::Config("target_column must not be empty".to_string()));
        }
        let q = &self.quality;
        for pct in [q.warning_null_pct, q.error_null_pct] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(UptakeError::Config(format!(
                    "null thresholds must be within 0-100, got {}",
                    pct
                )));
            }
        }
        if self.labels.target_segment == self.labels.others_segment {
            return Err(UptakeError::Config(
                "segment labels must differ".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.target_column, "Y");
        assert_eq!(config.quality.warning_null_pct, 50.0);
        assert_eq!(config.time.time_order, ["7AM", "10AM", "2PM", "6PM", "10PM"]);
        assert_eq!(config.profile.frequency_order[0], "never");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json_str(
            r#"{"target_column": "accepted", "quality": {"error_null_pct": 80.0}}"#,
        )
        .unwrap();
        assert_eq!(config.target_column, "accepted");
        assert_eq!(config.quality.error_null_pct, 80.0);
        assert_eq!(config.quality.warning_null_pct, 50.0);
        assert_eq!(config.time.time_column, "time");
    }

    #[test]
    fn test_rejects_bad_thresholds() {
        let err = AnalysisConfig::from_json_str(r#"{"quality": {"warning_null_pct": 150.0}}"#)
            .unwrap_err();
        assert!(matches!(err, UptakeError::Config(_)));
    }
}
