//! Core type definitions for column typing.

use serde::{Deserialize, Serialize};

use crate::input::Value;

/// Inferred data type for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers (no decimal point).
    Integer,
    /// Floating-point numbers (or a mix of integers and floats).
    Float,
    /// Boolean values (true/false).
    Boolean,
    /// Text/categorical values, or a mix of kinds.
    String,
    /// No non-null values to infer from.
    #[default]
    Unknown,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Returns true if values of this type are encoded by the categorical encoder.
    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnType::String)
    }

    /// Short label used in summary tables.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::String => "string",
            ColumnType::Unknown => "unknown",
        }
    }

    /// Infer a column type from its cells, ignoring nulls.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut inferred = ColumnType::Unknown;
        for value in values {
            let kind = match value {
                Value::Null => continue,
                Value::Bool(_) => ColumnType::Boolean,
                Value::Int(_) => ColumnType::Integer,
                Value::Float(_) => ColumnType::Float,
                Value::Text(_) => return ColumnType::String,
            };
            inferred = match (inferred, kind) {
                (ColumnType::Unknown, k) => k,
                (a, b) if a == b => a,
                (ColumnType::Integer, ColumnType::Float) | (ColumnType::Float, ColumnType::Integer) => {
                    ColumnType::Float
                }
                _ => return ColumnType::String,
            };
        }
        inferred
    }
}
