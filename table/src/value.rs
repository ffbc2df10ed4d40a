//! FILENAME: table/src/value.rs
//! PURPOSE: Defines the scalar values a dataset column can hold.
//! CONTEXT: `Value` is the raw cell content as loaded. `KeyValue` is its
//! hashable, totally ordered projection used for grouping and distinct counts.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// The storage type a column was loaded with.
/// Only `Integer` and `Float` count as numeric storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageType {
    Integer,
    Float,
    Text,
    Boolean,
}

impl StorageType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, StorageType::Integer | StorageType::Float)
    }
}

/// A single value within a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Empty,
    Integer(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Missing means `Empty` or a NaN number.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value. `None` for missing and non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    /// String form used when a value is compared as a category.
    /// Integral floats keep one decimal place (`25.0`) so they never collide
    /// with the integer rendering of the same number.
    pub fn display_string(&self) -> Option<String> {
        match self {
            Value::Empty => None,
            Value::Integer(i) => Some(i.to_string()),
            Value::Number(n) if n.is_nan() => None,
            Value::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    Some(format!("{:.1}", n))
                } else {
                    Some(n.to_string())
                }
            }
            Value::Text(s) => Some(s.clone()),
            Value::Boolean(true) => Some("True".to_string()),
            Value::Boolean(false) => Some("False".to_string()),
        }
    }

    pub fn key(&self) -> KeyValue {
        KeyValue::from(self)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Empty, Into::into)
    }
}

// ============================================================================
// ORDERED FLOAT
// ============================================================================

/// Wrapper around f64 that implements Eq, Ord and Hash for use in keys.
/// NaN values are equal to each other and sort after every number.
/// Negative zero is equal to (and hashes like) positive zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.is_nan(), other.0.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal),
        }
    }
}

impl Hash for OrderedFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

// ============================================================================
// KEY VALUE
// ============================================================================

/// Hashable projection of a `Value`.
///
/// The derived ordering is the group ordering: concrete values ascending
/// (integers, then floats, then text, then booleans when a column mixes them)
/// and `Missing` after everything else. All missing values are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyValue {
    Integer(i64),
    Number(OrderedFloat),
    Text(String),
    Boolean(bool),
    Missing,
}

impl KeyValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, KeyValue::Missing)
    }

    pub fn to_value(&self) -> Value {
        match self {
            KeyValue::Integer(i) => Value::Integer(*i),
            KeyValue::Number(n) => Value::Number(n.0),
            KeyValue::Text(s) => Value::Text(s.clone()),
            KeyValue::Boolean(b) => Value::Boolean(*b),
            KeyValue::Missing => Value::Empty,
        }
    }
}

impl From<&Value> for KeyValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Empty => KeyValue::Missing,
            Value::Integer(i) => KeyValue::Integer(*i),
            Value::Number(n) if n.is_nan() => KeyValue::Missing,
            Value::Number(n) => KeyValue::Number(OrderedFloat(*n)),
            Value::Text(s) => KeyValue::Text(s.clone()),
            Value::Boolean(b) => KeyValue::Boolean(*b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values() {
        assert!(Value::Empty.is_missing());
        assert!(Value::Number(f64::NAN).is_missing());
        assert!(!Value::Number(0.0).is_missing());
        assert!(!Value::text("").is_missing());
    }

    #[test]
    fn test_display_string() {
        assert_eq!(Value::Integer(25).display_string().as_deref(), Some("25"));
        assert_eq!(Value::Number(25.0).display_string().as_deref(), Some("25.0"));
        assert_eq!(Value::Number(2.5).display_string().as_deref(), Some("2.5"));
        assert_eq!(Value::Boolean(true).display_string().as_deref(), Some("True"));
        assert_eq!(Value::text("OH").display_string().as_deref(), Some("OH"));
        assert_eq!(Value::Empty.display_string(), None);
        assert_eq!(Value::Number(f64::NAN).display_string(), None);
    }

    #[test]
    fn test_key_ordering_puts_missing_last() {
        let mut keys = vec![
            KeyValue::Missing,
            KeyValue::Text("OH".to_string()),
            KeyValue::Text("IN".to_string()),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                KeyValue::Text("IN".to_string()),
                KeyValue::Text("OH".to_string()),
                KeyValue::Missing,
            ]
        );
    }

    #[test]
    fn test_nan_and_empty_share_a_key() {
        assert_eq!(Value::Number(f64::NAN).key(), Value::Empty.key());
    }

    #[test]
    fn test_ordered_float_zero() {
        assert_eq!(OrderedFloat(0.0), OrderedFloat(-0.0));
        assert_eq!(OrderedFloat(0.0).cmp(&OrderedFloat(-0.0)), Ordering::Equal);
        assert!(OrderedFloat(1.5) < OrderedFloat(2.0));
        assert!(OrderedFloat(f64::NAN) > OrderedFloat(f64::INFINITY));
    }
}
