//! Catalog value representation.

use crate::record::Record;
use std::fmt;

/// An ordered sequence of exclusively owned values.
pub type ValueArray = Vec<Value>;

/// A catalog value.
///
/// The case is fixed at construction. Containers own their children outright,
/// so a tree of values is dropped structurally with its root.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// 64-bit floating-point number.
    Number(f64),
    /// UTF-8 string.
    String(String),
    /// Boolean, written `true` or `false`.
    Boolean(bool),
    /// Array of values.
    Array(ValueArray),
    /// Record (property name to value).
    Record(Record),
}

/// The case tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    String,
    Boolean,
    Array,
    Record,
}

impl Value {
    /// Returns the active case.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Array(_) => ValueKind::Array,
            Value::Record(_) => ValueKind::Record,
        }
    }

    /// Returns the number if this is a `Number`.
    ///
    /// Booleans are not numbers here even though the format treats them as
    /// 0 and 1 internally; check the case first.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a `Boolean`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a reference to the array if this is an `Array`.
    pub fn as_array(&self) -> Option<&ValueArray> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Returns a reference to the record if this is a `Record`.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(rec) => Some(rec),
            _ => None,
        }
    }

    /// Consumes the value, returning the array if this is an `Array`.
    pub fn into_array(self) -> Option<ValueArray> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Consumes the value, returning the record if this is a `Record`.
    pub fn into_record(self) -> Option<Record> {
        match self {
            Value::Record(rec) => Some(rec),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Array(arr) => f.debug_list().entries(arr).finish(),
            Value::Record(rec) => f.debug_map().entries(rec.iter()).finish(),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<ValueArray> for Value {
    fn from(arr: ValueArray) -> Self {
        Value::Array(arr)
    }
}

impl From<Record> for Value {
    fn from(rec: Record) -> Self {
        Value::Record(rec)
    }
}
