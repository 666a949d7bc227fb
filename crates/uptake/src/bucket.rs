//! Many-to-few remapping of raw categorical labels.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, UptakeError};
use crate::input::{DataTable, Value};

/// Label given to values that no bucket claims.
pub const UNKNOWN_BUCKET: &str = "Unknown";

fn default_unknown() -> String {
    UNKNOWN_BUCKET.to_string()
}

/// Ordered mapping from a bucket label to the raw values it absorbs.
///
/// Buckets are scanned in insertion order and the first one listing a value
/// wins, so overlapping lists are resolved by order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buckets {
    buckets: IndexMap<String, Vec<String>>,
    #[serde(default = "default_unknown")]
    unknown_label: String,
}

impl Default for Buckets {
    fn default() -> Self {
        Self {
            buckets: IndexMap::new(),
            unknown_label: default_unknown(),
        }
    }
}

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bucket. Re-using a label replaces its values but keeps its
    /// original position.
    pub fn with_bucket<I, S>(mut self, label: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buckets
            .insert(label.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Override the label used for unmatched values.
    pub fn with_unknown_label(mut self, label: impl Into<String>) -> Self {
        self.unknown_label = label.into();
        self
    }

    pub fn unknown_label(&self) -> &str {
        &self.unknown_label
    }

    /// Bucket labels in scan order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Bucket claiming a raw value, if any. Nulls are never claimed.
    pub fn assign(&self, value: &Value) -> Option<&str> {
        if value.is_null() {
            return None;
        }
        let raw = value.label();
        self.buckets
            .iter()
            .find(|(_, values)| values.iter().any(|v| *v == raw))
            .map(|(label, _)| label.as_str())
    }

    fn check(&self) -> Result<()> {
        if self.buckets.contains_key(&self.unknown_label) {
            return Err(UptakeError::InvalidInput(format!(
                "bucket label '{}' is reserved for unmatched values",
                self.unknown_label
            )));
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<String>)> for Buckets {
    fn from_iter<T: IntoIterator<Item = (S, Vec<String>)>>(iter: T) -> Self {
        Self {
            buckets: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            unknown_label: default_unknown(),
        }
    }
}

/// Assign every row of `column` to a bucket label.
///
/// Values listed by no bucket, and nulls, get the unknown label; no row is
/// dropped.
pub fn bucketize(table: &DataTable, column: &str, buckets: &Buckets) -> Result<Vec<String>> {
    buckets.check()?;
    let index = table.require_column(column)?;

    let labels: Vec<String> = table
        .column_values(index)
        .map(|value| {
            buckets
                .assign(value)
                .unwrap_or(buckets.unknown_label())
                .to_string()
        })
        .collect();

    debug!(
        column,
        unknown = labels.iter().filter(|l| *l == buckets.unknown_label()).count(),
        "bucketized column"
    );
    Ok(labels)
}

/// Copy of `table` with the bucket labels of `column` appended as `new_column`.
pub fn with_bucket_column(
    table: &DataTable,
    column: &str,
    new_column: &str,
    buckets: &Buckets,
) -> Result<DataTable> {
    let labels = bucketize(table, column, buckets)?;
    table.with_column(new_column, labels.into_iter().map(Value::Text).collect())
}
