use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::ID_COLUMN;
use crate::value::Value;

/// One stored row: a field-name to typed-value mapping, always carrying the
/// implicit `ID` key. Persists as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates a record holding only the given identifier.
    pub fn with_id(id: i64) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(ID_COLUMN.to_string(), Value::Int(id));
        Self { fields }
    }

    /// The record identifier, if present and numeric.
    pub fn id(&self) -> Option<i64> {
        self.fields.get(ID_COLUMN).and_then(Value::as_int)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Writes a field, replacing any previous value.
    pub fn set(&mut self, column: &str, value: Value) {
        self.fields.insert(column.to_string(), value);
    }

    /// Text rendering of a field; absent fields render as the empty string.
    /// Filters and the display grid both compare and show this form.
    pub fn field_text(&self, column: &str) -> String {
        self.fields.get(column).map(Value::to_string).unwrap_or_default()
    }
}
