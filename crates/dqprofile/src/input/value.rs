//! Cell values and column storage kinds.

use serde::{Deserialize, Serialize};

/// A single cell of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value.
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Value {
    /// Whether this value counts as absent. `NaN` floats are absent too.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Coerce to a number, the way a lenient numeric conversion would.
    ///
    /// Booleans coerce to 0/1 and text is parsed after trimming. Returns
    /// `None` for nulls and for text that is not a number.
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            Value::Null => return None,
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
        };

        if number.is_nan() { None } else { Some(number) }
    }

    /// Render the value as text. Returns `None` for nulls.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Float(f) if f.is_nan() => None,
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(format!("{:?}", f)),
            Value::Bool(true) => Some("True".to_string()),
            Value::Bool(false) => Some("False".to_string()),
            Value::Text(s) => Some(s.clone()),
        }
    }

    /// Convert to JSON, with absent values as an explicit `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Int(i) => serde_json::Value::from(*i),
            // from_f64 yields None for NaN and infinities, which JSON cannot carry
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Equality/hash key. Numbers compare by value, so `Int(1)` and
    /// `Float(1.0)` share a key, and every null shares one key.
    pub(crate) fn key(&self) -> ValueKey<'_> {
        match self {
            Value::Null => ValueKey::Null,
            Value::Int(i) => ValueKey::Int(*i),
            Value::Float(f) if f.is_nan() => ValueKey::Null,
            Value::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    ValueKey::Int(*f as i64)
                } else {
                    ValueKey::Float(f.to_bits())
                }
            }
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Text(s) => ValueKey::Text(s.as_str()),
        }
    }
}

/// Hashable identity of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey<'a> {
    Null,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(&'a str),
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
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// How a dataset natively stores a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// Booleans.
    Boolean,
    /// Text, or a mix of kinds.
    Text,
}

impl StorageKind {
    /// Returns true for the numeric storage kinds (booleans included).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            StorageKind::Integer | StorageKind::Float | StorageKind::Boolean
        )
    }

    /// Detect the storage kind from a column's values.
    ///
    /// Columns with no present values are stored as text.
    pub fn detect(values: &[Value]) -> Self {
        let mut kind: Option<StorageKind> = None;

        for value in values.iter().filter(|v| !v.is_null()) {
            let this = match value {
                Value::Int(_) => StorageKind::Integer,
                Value::Float(_) => StorageKind::Float,
                Value::Bool(_) => StorageKind::Boolean,
                _ => return StorageKind::Text,
            };

            kind = Some(match (kind, this) {
                (None, k) => k,
                (Some(a), b) if a == b => a,
                (Some(StorageKind::Integer), StorageKind::Float)
                | (Some(StorageKind::Float), StorageKind::Integer) => StorageKind::Float,
                _ => return StorageKind::Text,
            });
        }

        kind.unwrap_or(StorageKind::Text)
    }
}
