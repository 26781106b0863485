use crate::data_type::DataType;
use crate::error::{DbError, Result};
use crate::value::Value;

/// Converts raw clause text into a typed value according to a column's
/// declared type.
///
/// - `bool` accepts `true`/`1`/`yes`/`y` and `false`/`0`/`no`/`n`,
///   case-insensitively.
/// - `str` trims surrounding whitespace and strips one matching pair of
///   `"` or `'` quotes; the inner text is kept verbatim.
/// - `int` is a base-10 parse of the trimmed text.
///
/// # Errors
/// Returns [DbError::TypeConversion] carrying the offending text and the
/// declared type when the conversion is impossible.
///
/// # Example
/// ```
/// use flatdb::{coerce::coerce, DataType, Value};
/// assert_eq!(coerce("YES", DataType::Bool).unwrap(), Value::Bool(true));
/// assert_eq!(coerce("'Ann'", DataType::Str).unwrap(), Value::Str("Ann".into()));
/// assert_eq!(coerce(" 42 ", DataType::Int).unwrap(), Value::Int(42));
/// assert!(coerce("maybe", DataType::Bool).is_err());
/// ```
pub fn coerce(raw: &str, declared: DataType) -> Result<Value> {
    match declared {
        DataType::Bool => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Ok(Value::Bool(true)),
            "false" | "0" | "no" | "n" => Ok(Value::Bool(false)),
            _ => Err(conversion_error(raw, declared)),
        },
        DataType::Str => Ok(Value::Str(unquote(raw.trim()).to_string())),
        DataType::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| conversion_error(raw, declared)),
    }
}

/// Strips one matching pair of surrounding `"` or `'` quotes, if present.
/// A lone quote character is not a pair and passes through unchanged.
pub(crate) fn unquote(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn conversion_error(raw: &str, expected: DataType) -> DbError {
    DbError::TypeConversion {
        value: raw.to_string(),
        expected,
    }
}
