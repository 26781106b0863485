use crate::coerce::unquote;
use crate::error::{DbError, Result};
use crate::value::Value;

/// Controls how the fragment parsers react to text that is not a
/// `key = value` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Skip malformed fragments silently. This matches the historical
    /// grammar, where a fragment without `=` simply vanishes from the
    /// parsed clause.
    #[default]
    Permissive,
    /// Reject the whole clause when any fragment is malformed.
    Strict,
}

/// A single `column = value` filter with the operand still in raw text
/// form, ready for schema-aware coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub raw_value: String,
}

/// Splits one `key = value` fragment at its first `=`.
///
/// This is the engine's filter path: only a single equality is recognized,
/// and the operand is left as text so the target column's declared type can
/// drive the conversion. Returns `None` when there is no `=` or the key is
/// empty.
pub fn parse_condition(input: &str) -> Option<Condition> {
    let (column, value) = input.split_once('=')?;
    let column = column.trim();
    if column.is_empty() {
        return None;
    }
    Some(Condition {
        column: column.to_string(),
        raw_value: value.trim().to_string(),
    })
}

/// Infers a typed value from bare clause text, without consulting any
/// schema: quoted text is a string literal, all-digit text an integer,
/// `true`/`false` (any case) a boolean, anything else a string as-is.
///
/// Schema-aware [coercion](crate::coerce::coerce) takes precedence over
/// this inference whenever the target column is known.
///
/// # Example
/// ```
/// use flatdb::{clause::infer, Value};
/// assert_eq!(infer("30"), Value::Int(30));
/// assert_eq!(infer("'30'"), Value::Str("30".into()));
/// assert_eq!(infer("TRUE"), Value::Bool(true));
/// assert_eq!(infer("-5"), Value::Str("-5".into()));
/// ```
pub fn infer(raw: &str) -> Value {
    let trimmed = raw.trim();
    let unquoted = unquote(trimmed);
    if unquoted.len() != trimmed.len() {
        return Value::Str(unquoted.to_string());
    }
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        // All-digit text wider than i64 stays a string.
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int(i);
        }
        return Value::Str(trimmed.to_string());
    }
    match trimmed.to_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Str(trimmed.to_string()),
    }
}

/// Parses a WHERE fragment sequence joined by the literal separator
/// `" and "` into ordered key/value pairs.
///
/// # Example
/// ```
/// use flatdb::{clause::{parse_where, ParseMode}, Value};
/// let pairs = parse_where("age = 30 and active = true", ParseMode::Permissive).unwrap();
/// assert_eq!(pairs, vec![
///     ("age".to_string(), Value::Int(30)),
///     ("active".to_string(), Value::Bool(true)),
/// ]);
/// ```
pub fn parse_where(input: &str, mode: ParseMode) -> Result<Vec<(String, Value)>> {
    parse_pairs(input, " and ", mode)
}

/// Parses a SET fragment sequence joined by `,` into ordered key/value
/// pairs.
pub fn parse_set(input: &str, mode: ParseMode) -> Result<Vec<(String, Value)>> {
    parse_pairs(input, ",", mode)
}

fn parse_pairs(input: &str, separator: &str, mode: ParseMode) -> Result<Vec<(String, Value)>> {
    let mut pairs = Vec::new();
    for part in input.split(separator) {
        match part.split_once('=') {
            Some((key, value)) => pairs.push((key.trim().to_string(), infer(value))),
            None => match mode {
                ParseMode::Permissive => continue,
                ParseMode::Strict => {
                    return Err(DbError::MalformedClause(part.trim().to_string()));
                }
            },
        }
    }
    Ok(pairs)
}

/// Parses a VALUES fragment: an optional single enclosing parenthesis
/// pair, then a comma-separated list mapped positionally to a table's
/// declared columns.
///
/// Wrapping is only stripped when both parentheses are present; a
/// half-open wrapper flows into the first or last token unchanged.
pub fn parse_values(input: &str) -> Vec<Value> {
    let trimmed = input.trim();
    let inner = if trimmed.len() >= 2 && trimmed.starts_with('(') && trimmed.ends_with(')') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    inner.split(',').map(infer).collect()
}
