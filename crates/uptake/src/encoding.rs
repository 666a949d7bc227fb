//! Frequency-ranked categorical-to-integer encoding.
//!
//! Each non-numeric, non-boolean column is replaced by integer codes `1..=N`,
//! where code 1 is the most frequent value. Ties go to the value seen first.
//! Mappings are rebuilt on every call, so codes are only meaningful together
//! with the mapping returned alongside them.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Result, UptakeError};
use crate::input::{DataTable, Value};

/// Bijection between a column's distinct values and their codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueMapping {
    pub column: String,
    /// Values in code order; the value at position `i` has code `i + 1`.
    values: IndexSet<Value>,
}

impl ValueMapping {
    /// Code assigned to a value.
    pub fn code_of(&self, value: &Value) -> Option<i64> {
        self.values.get_index_of(value).map(|i| i as i64 + 1)
    }

    /// Value behind a code.
    pub fn value_of(&self, code: i64) -> Option<&Value> {
        code.checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| self.values.get_index(i))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(value, code)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, i64)> {
        self.values.iter().enumerate().map(|(i, v)| (v, i as i64 + 1))
    }
}

/// Encoded copy of a table plus the mapping used for each encoded column.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedTable {
    pub table: DataTable,
    /// Column name → mapping, in column order. Pass-through columns are absent.
    pub mappings: IndexMap<String, ValueMapping>,
}

impl EncodedTable {
    /// Recover the original values of an encoded column.
    ///
    /// Columns that were passed through are returned as-is.
    pub fn decode_column(&self, column: &str) -> Result<Vec<Value>> {
        let index = self.table.require_column(column)?;
        let Some(mapping) = self.mappings.get(column) else {
            return Ok(self.table.column_values(index).cloned().collect());
        };

        self.table
            .column_values(index)
            .map(|cell| match cell {
                Value::Null => Ok(Value::Null),
                Value::Int(code) => mapping.value_of(*code).cloned().ok_or_else(|| {
                    UptakeError::InvalidInput(format!(
                        "code {} is not in the mapping for '{}'",
                        code, column
                    ))
                }),
                other => Err(UptakeError::InvalidInput(format!(
                    "unexpected cell {} in encoded column '{}'",
                    other, column
                ))),
            })
            .collect()
    }
}

/// Rank distinct non-null values by count descending, then first appearance.
fn rank_values<'a>(values: impl Iterator<Item = &'a Value>) -> IndexSet<Value> {
    let mut counts: IndexMap<&Value, usize> = IndexMap::new();
    for value in values.filter(|v| !v.is_null()) {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut ranked: Vec<(usize, &Value, usize)> = counts
        .into_iter()
        .enumerate()
        .map(|(first_seen, (value, count))| (first_seen, value, count))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));

    ranked.into_iter().map(|(_, value, _)| value.clone()).collect()
}

/// Encode every categorical column of `table` as integer codes.
///
/// Integer, float, boolean and all-null columns are passed through
/// unchanged; nulls in encoded columns stay null. The input is not modified.
#[instrument(skip(table), fields(rows = table.row_count(), columns = table.column_count()))]
pub fn encode_categorical(table: &DataTable) -> Result<EncodedTable> {
    let mut encoded = table.clone();
    let mut mappings = IndexMap::new();

    for (index, name) in table.headers().iter().enumerate() {
        if !table.column_type(index).is_categorical() {
            continue;
        }

        let mapping = ValueMapping {
            column: name.clone(),
            values: rank_values(table.column_values(index)),
        };
        let codes: Vec<Value> = table
            .column_values(index)
            .map(|v| match mapping.code_of(v) {
                Some(code) => Value::Int(code),
                None => Value::Null,
            })
            .collect();

        debug!(column = %name, distinct = mapping.len(), "encoded column");
        encoded = encoded.replace_column(index, codes);
        mappings.insert(name.clone(), mapping);
    }

    Ok(EncodedTable {
        table: encoded,
        mappings,
    })
}

/// Flatten mappings into a table with columns `Column, OriginalValue, NumericCode`.
pub fn mapping_table(mappings: &IndexMap<String, ValueMapping>) -> Result<DataTable> {
    let headers = ["Column", "OriginalValue", "NumericCode"]
        .map(String::from)
        .to_vec();
    let rows = mappings
        .values()
        .flat_map(|mapping| {
            mapping.iter().map(|(value, code)| {
                vec![
                    Value::from(mapping.column.as_str()),
                    value.clone(),
                    Value::Int(code),
                ]
            })
        })
        .collect();
    DataTable::new(headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataTable {
        DataTable::from_columns(vec![
            (
                "weather",
                vec![
                    Value::from("Sunny"),
                    "Rainy".into(),
                    "Snowy".into(),
                    "Rainy".into(),
                    Value::Null,
                    "Sunny".into(),
                    "Rainy".into(),
                ],
            ),
            (
                "temperature",
                vec![
                    Value::Int(80),
                    Value::Int(55),
                    Value::Int(30),
                    Value::Int(55),
                    Value::Int(80),
                    Value::Int(80),
                    Value::Int(30),
                ],
            ),
            ("Y", (0..7).map(|i| Value::Int(i % 2)).collect()),
        ])
        .unwrap()
    }

    #[test]
    fn test_most_frequent_gets_code_one() {
        let encoded = encode_categorical(&table()).unwrap();
        let mapping = &encoded.mappings["weather"];

        assert_eq!(mapping.code_of(&Value::from("Rainy")), Some(1));
        assert_eq!(mapping.code_of(&Value::from("Sunny")), Some(2));
        assert_eq!(mapping.code_of(&Value::from("Snowy")), Some(3));
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let table = DataTable::from_columns(vec![("c", vec!["b", "a", "a", "b", "c"])]).unwrap();
        let encoded = encode_categorical(&table).unwrap();
        let mapping = &encoded.mappings["c"];
        assert_eq!(mapping.value_of(1), Some(&Value::from("b")));
        assert_eq!(mapping.value_of(2), Some(&Value::from("a")));
        assert_eq!(mapping.value_of(3), Some(&Value::from("c")));
        assert_eq!(mapping.value_of(0), None);
        assert_eq!(mapping.value_of(4), None);
    }

    #[test]
    fn test_numeric_columns_pass_through_and_nulls_stay_null() {
        let original = table();
        let encoded = encode_categorical(&original).unwrap();

        assert!(!encoded.mappings.contains_key("temperature"));
        assert!(!encoded.mappings.contains_key("Y"));
        assert_eq!(encoded.table.get(0, 1), original.get(0, 1));
        assert_eq!(encoded.table.get(4, 0), Some(&Value::Null));
        assert_eq!(encoded.table.get(0, 0), Some(&Value::Int(2)));
    }

    #[test]
    fn test_round_trip() {
        let original = table();
        let encoded = encode_categorical(&original).unwrap();
        let decoded = encoded.decode_column("weather").unwrap();
        let expected: Vec<Value> = original.column("weather").unwrap().cloned().collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_out_of_range_codes_rejected() {
        let encoded = encode_categorical(&table()).unwrap();
        let mapping = &encoded.mappings["weather"];
        assert_eq!(mapping.value_of(i64::MIN), None);
        assert_eq!(mapping.value_of(0), None);
        assert_eq!(mapping.value_of(4), None);
        assert_eq!(mapping.value_of(1), Some(&Value::from("Rainy")));

        let index = encoded.table.column_index("weather").unwrap();
        let mut tampered = encoded.clone();
        let mut codes: Vec<Value> = tampered.table.column_values(index).cloned().collect();
        codes[0] = Value::Int(i64::MIN);
        tampered.table = tampered.table.replace_column(index, codes);

        let err = tampered.decode_column("weather").unwrap_err();
        assert!(matches!(err, UptakeError::InvalidInput(_)));
    }

    #[test]
    fn test_input_not_modified() {
        let original = table();
        let copy = original.clone();
        let _ = encode_categorical(&original).unwrap();
        assert_eq!(original, copy);
    }

    #[test]
    fn test_mapping_table() {
        let encoded = encode_categorical(&table()).unwrap();
        let out = mapping_table(&encoded.mappings).unwrap();
        assert_eq!(out.headers(), ["Column", "OriginalValue", "NumericCode"]);
        assert_eq!(out.row_count(), 3);
        assert_eq!(out.get(0, 1), Some(&Value::from("Rainy")));
        assert_eq!(out.get(0, 2), Some(&Value::Int(1)));
    }
}
