//! Typed cell values.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A single cell of a [`DataTable`](super::DataTable).
///
/// Values have a total order used for grouping and natural sorting:
/// `Null < Bool < numbers < Text`. Integers and floats compare numerically,
/// so `Int(1)` and `Float(1.0)` fall into the same group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Whole number.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Free text or categorical label.
    Text(String),
}

impl Value {
    /// Parse a raw field into a typed value.
    ///
    /// NA-like tokens become [`Value::Null`]; `true`/`false` become booleans;
    /// anything that parses as an integer or float becomes a number.
    pub fn parse(raw: &str) -> Self {
        if Self::is_null_token(raw) {
            return Value::Null;
        }
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return Value::Float(f);
            }
        }
        Value::Text(raw.to_string())
    }

    /// Check if a raw field represents a missing/null value.
    pub fn is_null_token(raw: &str) -> bool {
        let trimmed = raw.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value (booleans and text are not numbers).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Read the value as an accepted (`true`) / declined (`false`) indicator.
    pub fn as_indicator(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            Value::Float(f) if *f == 0.0 => Some(false),
            Value::Float(f) if *f == 1.0 => Some(true),
            Value::Text(s) => match s.trim() {
                "0" => Some(false),
                "1" => Some(true),
                t if t.eq_ignore_ascii_case("false") => Some(false),
                t if t.eq_ignore_ascii_case("true") => Some(true),
                _ => None,
            },
            _ => None,
        }
    }

    /// Text form used when matching against label lists.
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Approximate heap + inline size in bytes.
    pub(crate) fn footprint(&self) -> usize {
        let inline = std::mem::size_of::<Value>();
        match self {
            Value::Text(s) => inline + s.capacity(),
            _ => inline,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Text(_) => 3,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => {
                a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b))
            }
            (Value::Int(i), Value::Float(f)) => cmp_int_float(*i, *f),
            (Value::Float(f), Value::Int(i)) => cmp_int_float(*i, *f).reverse(),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Lower bound of the `i64` range as a float (`-2^63`, exact).
const I64_MIN_F64: f64 = i64::MIN as f64;

/// Integer part of `f` when it lies in the `i64` range.
fn float_as_i64(f: f64) -> Option<i64> {
    (f >= I64_MIN_F64 && f < -I64_MIN_F64).then(|| f.trunc() as i64)
}

/// Exact comparison of an integer with a float, without rounding `i` to `f64`.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        return (i as f64).total_cmp(&f);
    }
    match float_as_i64(f) {
        Some(whole) => i.cmp(&whole).then_with(|| {
            let fract = f.fract();
            if fract > 0.0 {
                Ordering::Less
            } else if fract < 0.0 {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }),
        None if f > 0.0 => Ordering::Less,
        None => Ordering::Greater,
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::Int(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            // Integral floats hash like the equal integer.
            Value::Float(f) if f.fract() == 0.0 && float_as_i64(*f).is_some() => {
                2u8.hash(state);
                (*f as i64).hash(state);
            }
            Value::Float(f) => {
                2u8.hash(state);
                f.to_bits().hash(state);
            }
            Value::Text(s) => {
                3u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}
