//! Tagged document value type.
//!
//! The viewer ingests a document once into a tagged variant so the traversal
//! never has to re-derive "is this an array, an object, or a scalar" from
//! runtime introspection on every step.

use std::fmt;

/// A scalar leaf of the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// JSON string.
    String(String),
    /// JSON number. Stored as f64; integers survive up to 2^53.
    Number(f64),
    /// JSON boolean.
    Bool(bool),
    /// JSON null.
    Null,
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "\"{}\"", s),
            Scalar::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Null => write!(f, "null"),
        }
    }
}

/// An in-memory document: ordered key/value members, ordered sequences,
/// and scalar leaves.
///
/// Member order is the document's own order and is preserved through
/// ingestion; the sequencer never sorts or reorders.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Ordered key -> value members.
    Object(Vec<(String, Value)>),
    /// Ordered element sequence.
    Array(Vec<Value>),
    /// Leaf.
    Scalar(Scalar),
}

impl Value {
    /// True for `Object` and `Array` variants.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }

    /// Number of direct children (0 for scalars).
    pub fn child_count(&self) -> usize {
        match self {
            Value::Object(members) => members.len(),
            Value::Array(elements) => elements.len(),
            Value::Scalar(_) => 0,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(raw: serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
            serde_json::Value::Array(elements) => {
                Value::Array(elements.into_iter().map(Value::from).collect())
            }
            serde_json::Value::String(s) => Value::Scalar(Scalar::String(s)),
            serde_json::Value::Number(n) => {
                Value::Scalar(Scalar::Number(n.as_f64().unwrap_or(f64::NAN)))
            }
            serde_json::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            serde_json::Value::Null => Value::Scalar(Scalar::Null),
        }
    }
}

/// Reference recursive line count for a container value.
///
/// Counts the lines the sequencer will emit for the *children* of `value`:
/// an array member contributes its open and close lines plus its children,
/// an object member contributes only its open line plus its children (objects
/// have no close line), and a scalar member contributes one property line.
pub fn count_lines(value: &Value) -> usize {
    match value {
        Value::Object(members) => members.iter().map(|(_, v)| member_lines(v)).sum(),
        Value::Array(elements) => elements.iter().map(member_lines).sum(),
        Value::Scalar(_) => 0,
    }
}

fn member_lines(value: &Value) -> usize {
    match value {
        Value::Array(_) => 2 + count_lines(value),
        Value::Object(_) => 1 + count_lines(value),
        Value::Scalar(_) => 1,
    }
}
