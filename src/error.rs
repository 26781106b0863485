use thiserror::Error;

use crate::data_type::DataType;

pub type Result<T> = std::result::Result<T, DbError>;

/// Errors produced by schema validation, clause parsing, type coercion,
/// and the storage collaborator.
///
/// Every engine operation returns these as typed values; turning them into
/// user-facing messages is the job of the interactive front end, so callers
/// can still match on the failure kind.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("table '{0}' already exists")]
    TableExists(String),

    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    #[error("invalid column spec '{spec}': {reason}")]
    InvalidColumnSpec { spec: String, reason: String },

    #[error("expected {expected} values but got {got}")]
    ValueCountMismatch { expected: usize, got: usize },

    #[error("malformed clause '{0}', expected column = value")]
    MalformedClause(String),

    #[error("cannot convert '{value}' to {expected}")]
    TypeConversion { value: String, expected: DataType },

    /// The implicit primary key is assigned by the engine and never rewritten.
    #[error("the ID column cannot be reassigned")]
    IdImmutable,

    #[error("no matching records in table '{0}'")]
    NoMatch(String),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt database file: {0}")]
    Json(#[from] serde_json::Error),
}
