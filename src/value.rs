use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data_type::DataType;

/// Represents a single data value stored in a record.
///
/// The untagged serde representation keeps table files flat: an `Int`
/// persists as a JSON number, a `Str` as a JSON string, and a `Bool` as a
/// JSON boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A 64-bit signed integer value.
    Int(i64),
    /// A UTF-8 string value.
    Str(String),
    /// A boolean value.
    Bool(bool),
}

impl Value {
    /// Returns the inner integer value if this is a [Value::Int].
    /// Otherwise, returns `None`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns a reference to the inner string slice if this is a [Value::Str].
    /// Otherwise, returns `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner boolean value if this is a [Value::Bool].
    /// Otherwise, returns `None`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the logical [DataType] corresponding to this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int,
            Self::Str(_) => DataType::Str,
            Self::Bool(_) => DataType::Bool,
        }
    }
}

/// The canonical text rendering, used both for display and for filter
/// comparisons: all equality checks in the engine compare this form, never
/// the typed values themselves.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}
