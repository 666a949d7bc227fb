//! Canonical display orders for categorical axes.

use serde::{Deserialize, Serialize};

use crate::input::Value;

/// Time-of-day buckets, earliest first.
pub const TIME_OF_DAY_ORDER: &[&str] = &["7AM", "10AM", "2PM", "6PM", "10PM"];

/// Visit-frequency labels, least frequent first.
pub const VISIT_FREQUENCY_ORDER: &[&str] = &["never", "less1", "1~3", "4~8", "gt8"];

/// Age groups, youngest first.
pub const AGE_ORDER: &[&str] = &["below21", "21", "26", "31", "36", "41", "46", "50plus"];

/// A fixed ordering of category labels, independent of data order.
///
/// Values are matched by their text form, so the integer cell `21` matches
/// the label `"21"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryOrder {
    labels: Vec<String>,
}

impl CategoryOrder {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn time_of_day() -> Self {
        Self::new(TIME_OF_DAY_ORDER.iter().copied())
    }

    pub fn visit_frequency() -> Self {
        Self::new(VISIT_FREQUENCY_ORDER.iter().copied())
    }

    pub fn age() -> Self {
        Self::new(AGE_ORDER.iter().copied())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Position of a value in the order, if listed.
    pub fn position(&self, value: &Value) -> Option<usize> {
        if value.is_null() {
            return None;
        }
        let label = value.label();
        self.labels.iter().position(|l| *l == label)
    }

    /// Sort key placing listed values first, in order, and the rest after.
    pub(crate) fn sort_key(&self, value: &Value) -> usize {
        self.position(value).unwrap_or(usize::MAX)
    }
}

impl From<Vec<String>> for CategoryOrder {
    fn from(labels: Vec<String>) -> Self {
        Self { labels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_matches_text_form() {
        let order = CategoryOrder::age();
        assert_eq!(order.position(&Value::Int(21)), Some(1));
        assert_eq!(order.position(&Value::from("50plus")), Some(7));
        assert_eq!(order.position(&Value::from("90")), None);
        assert_eq!(order.position(&Value::Null), None);
    }
}
