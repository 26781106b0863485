use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data_type::DataType;
use crate::error::{DbError, Result};

/// Name of the implicit primary-key column every table starts with.
pub const ID_COLUMN: &str = "ID";

/// A single column declaration: a name and a declared type.
///
/// Prints and parses as the `name:type` spelling, which is also how it
/// serializes, so the schema file stays a plain document of
/// `{"table": ["ID:int", "name:str"]}` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.data_type)
    }
}

impl FromStr for ColumnDef {
    type Err = DbError;

    fn from_str(spec: &str) -> Result<Self> {
        let Some((name, declared)) = spec.split_once(':') else {
            return Err(DbError::InvalidColumnSpec {
                spec: spec.to_string(),
                reason: "expected name:type".into(),
            });
        };
        if name.is_empty() {
            return Err(DbError::InvalidColumnSpec {
                spec: spec.to_string(),
                reason: "column name is empty".into(),
            });
        }
        let data_type = declared.parse().map_err(|_| DbError::InvalidColumnSpec {
            spec: spec.to_string(),
            reason: "allowed types are int, str, bool".into(),
        })?;
        Ok(Self {
            name: name.to_string(),
            data_type,
        })
    }
}

impl TryFrom<String> for ColumnDef {
    type Error = DbError;

    fn try_from(spec: String) -> Result<Self> {
        spec.parse()
    }
}

impl From<ColumnDef> for String {
    fn from(column: ColumnDef) -> Self {
        column.to_string()
    }
}

/// The schema store: an ordered mapping of table name to column
/// definitions, loaded from and saved to the metadata document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tables: BTreeMap<String, Vec<ColumnDef>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table under `name` with the given `name:type` column
    /// specs, prefixed by the implicit `ID:int` column.
    ///
    /// # Errors
    /// Fails when the table already exists, a spec has no `:`, a column
    /// name is empty or duplicated, or a declared type is unknown. The
    /// catalog is left unchanged on failure.
    pub fn create_table(&mut self, name: &str, specs: &[String]) -> Result<()> {
        if self.tables.contains_key(name) {
            return Err(DbError::TableExists(name.to_string()));
        }

        let mut columns = vec![ColumnDef::new(ID_COLUMN, DataType::Int)];
        for spec in specs {
            let column: ColumnDef = spec.parse()?;
            if columns.iter().any(|c| c.name == column.name) {
                return Err(DbError::InvalidColumnSpec {
                    spec: spec.clone(),
                    reason: format!("duplicate column '{}'", column.name),
                });
            }
            columns.push(column);
        }

        self.tables.insert(name.to_string(), columns);
        Ok(())
    }

    /// Removes a table from the catalog.
    ///
    /// # Errors
    /// Returns [DbError::TableNotFound] if the name is absent.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        match self.tables.remove(name) {
            Some(_) => Ok(()),
            None => Err(DbError::TableNotFound(name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Ordered column definitions of a table, `ID` first.
    pub fn columns(&self, name: &str) -> Result<&[ColumnDef]> {
        self.tables
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    /// Declared type of a column. Undeclared columns fall back to `str`,
    /// which is also how filters treat unknown fields.
    pub fn column_type(&self, table: &str, column: &str) -> DataType {
        self.tables
            .get(table)
            .and_then(|columns| columns.iter().find(|c| c.name == column))
            .map(|c| c.data_type)
            .unwrap_or(DataType::Str)
    }

    /// Lexicographically sorted table names, or `None` when the catalog is
    /// empty. The iterator is lazy and `Clone`, so a consumed listing can
    /// be restarted.
    pub fn tables(&self) -> Option<Tables<'_>> {
        if self.tables.is_empty() {
            None
        } else {
            Some(Tables {
                names: self.tables.keys(),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Sorted, restartable iterator over catalog table names.
#[derive(Debug, Clone)]
pub struct Tables<'a> {
    names: btree_map::Keys<'a, String, Vec<ColumnDef>>,
}

impl<'a> Iterator for Tables<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.names.next().map(String::as_str)
    }
}
