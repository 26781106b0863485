use std::time::Instant;

use tracing::{debug, info};

use crate::cache::QueryCache;
use crate::clause;
use crate::coerce::coerce;
use crate::confirm::ConfirmAction;
use crate::error::{DbError, Result};
use crate::record::Record;
use crate::schema::{Catalog, ColumnDef, ID_COLUMN, Tables};
use crate::storage::Storage;
use crate::value::Value;

/// The engine entry point: owns the catalog, the storage collaborator and
/// the per-instance query cache, and orchestrates every schema and data
/// operation.
pub struct Database<S: Storage> {
    catalog: Catalog,
    storage: S,
    cache: QueryCache<Selection>,
}

/// Outcome of a read: distinguishes an empty table and an empty filter
/// result from a populated row set, so the front end can report each case.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// At least one record qualified, in storage order.
    Rows(Vec<Record>),
    /// The table holds no records at all.
    EmptyTable,
    /// The table has records but none matched the filter.
    NoMatch,
}

/// Outcome of a drop request once the confirmation capability has been
/// consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Dropped,
    Cancelled,
}

/// Schema and row-count summary returned by [Database::info].
#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub record_count: usize,
}

impl<S: Storage> Database<S> {
    /// Opens an engine over the given storage, loading the persisted
    /// catalog. The query cache starts cold; it is scoped to this instance
    /// and never survives a reopen.
    ///
    /// # Example
    /// ```
    /// use flatdb::{Database, JsonStorage, Selection, Value};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let mut db = Database::open(JsonStorage::new(dir.path())).unwrap();
    ///
    /// db.create_table("users", &["name:str".into()]).unwrap();
    /// db.insert("users", &[Value::Str("Ann".into())]).unwrap();
    ///
    /// let result = db.select("users", Some("name = Ann")).unwrap();
    /// assert!(matches!(result, Selection::Rows(rows) if rows.len() == 1));
    /// ```
    pub fn open(storage: S) -> Result<Self> {
        let catalog = storage.load_catalog()?;
        Ok(Self {
            catalog,
            storage,
            cache: QueryCache::new(),
        })
    }

    /// Read access to the schema store.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Creates a table and persists the updated catalog.
    ///
    /// # Errors
    /// Propagates catalog validation failures ([DbError::TableExists],
    /// [DbError::InvalidColumnSpec]) and storage failures.
    pub fn create_table(&mut self, name: &str, specs: &[String]) -> Result<()> {
        self.catalog.create_table(name, specs)?;
        self.storage.save_catalog(&self.catalog)?;
        info!(table = name, "table created");
        Ok(())
    }

    /// Drops a table after consulting the injected confirmation capability.
    /// A declined confirmation is a [DropOutcome::Cancelled], not an error.
    ///
    /// The table's data document is left behind, so re-creating a table of
    /// the same name resurrects its old records.
    pub fn drop_table(&mut self, name: &str, confirm: &dyn ConfirmAction) -> Result<DropOutcome> {
        if !self.catalog.contains(name) {
            return Err(DbError::TableNotFound(name.to_string()));
        }
        if !confirm.confirm(&format!("drop table {name}")) {
            return Ok(DropOutcome::Cancelled);
        }
        self.catalog.drop_table(name)?;
        self.storage.save_catalog(&self.catalog)?;
        info!(table = name, "table dropped");
        Ok(DropOutcome::Dropped)
    }

    /// Sorted table names, or `None` when no tables exist.
    pub fn list_tables(&self) -> Option<Tables<'_>> {
        self.catalog.tables()
    }

    /// Inserts one record built positionally from `values`.
    ///
    /// Each value's text rendering is re-coerced against the declared type
    /// of its column; the first failure aborts the whole insert with
    /// nothing written. The new record gets `ID = max(existing) + 1`, or
    /// `1` for an empty table, so identifiers are gap-tolerant and never
    /// reused in ascending order.
    ///
    /// # Errors
    /// [DbError::TableNotFound], [DbError::ValueCountMismatch] when the
    /// count differs from the declared non-ID columns, and
    /// [DbError::TypeConversion] per value.
    pub fn insert(&mut self, table: &str, values: &[Value]) -> Result<Vec<Record>> {
        let start = Instant::now();
        let columns = self.catalog.columns(table)?;
        let data_columns = &columns[1..]; // everything after the implicit ID

        if values.len() != data_columns.len() {
            return Err(DbError::ValueCountMismatch {
                expected: data_columns.len(),
                got: values.len(),
            });
        }

        let mut coerced = Vec::with_capacity(values.len());
        for (value, column) in values.iter().zip(data_columns) {
            coerced.push(coerce(&value.to_string(), column.data_type)?);
        }

        let mut records = self.storage.load_records(table)?;
        let next_id = records.iter().filter_map(Record::id).max().unwrap_or(0) + 1;

        let mut record = Record::with_id(next_id);
        for (column, value) in data_columns.iter().zip(coerced) {
            record.set(&column.name, value);
        }
        records.push(record);
        self.storage.save_records(table, &records)?;

        debug!(
            table,
            id = next_id,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "insert finished"
        );
        Ok(records)
    }

    /// Runs a read over a table. `filter` is at most one `column = value`
    /// equality; both sides are compared by their text rendering.
    ///
    /// Non-error outcomes are memoized under the exact `(table, filter
    /// text)` key, so a later identical call returns the first outcome even
    /// if the table changed in between. [Database::info] always reflects
    /// the live state.
    ///
    /// # Errors
    /// [DbError::TableNotFound], [DbError::MalformedClause] when the filter
    /// has no `column = value` shape, [DbError::TypeConversion] when the
    /// operand does not fit the column's declared type.
    pub fn select(&mut self, table: &str, filter: Option<&str>) -> Result<Selection> {
        let start = Instant::now();
        if !self.catalog.contains(table) {
            return Err(DbError::TableNotFound(table.to_string()));
        }

        let condition = match filter {
            Some(text) => {
                let condition = clause::parse_condition(text)
                    .ok_or_else(|| DbError::MalformedClause(text.to_string()))?;
                let declared = self.catalog.column_type(table, &condition.column);
                let operand = coerce(&condition.raw_value, declared)?;
                Some((condition.column, operand.to_string()))
            }
            None => None,
        };

        let key = format!("{table}:{}", filter.unwrap_or_default());
        let storage = &self.storage;
        let outcome = self.cache.get_or_compute(&key, || -> Result<Selection> {
            let records = storage.load_records(table)?;
            if records.is_empty() {
                return Ok(Selection::EmptyTable);
            }
            let rows: Vec<Record> = match &condition {
                Some((column, operand)) => records
                    .into_iter()
                    .filter(|record| record.field_text(column) == *operand)
                    .collect(),
                None => records,
            };
            if rows.is_empty() {
                Ok(Selection::NoMatch)
            } else {
                Ok(Selection::Rows(rows))
            }
        })?;

        debug!(
            table,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "select finished"
        );
        Ok(outcome)
    }

    /// Overwrites one field on every record matching the filter, then
    /// persists the whole set once and returns it.
    ///
    /// Both clauses must parse as single `column = value` pairs, and each
    /// operand is coerced against its own column's declared type.
    ///
    /// # Errors
    /// [DbError::IdImmutable] when the set clause targets `ID`,
    /// [DbError::NoMatch] when the filter matches nothing (storage is left
    /// untouched), plus the same clause and conversion failures as
    /// [Database::select].
    pub fn update(
        &mut self,
        table: &str,
        set_clause: &str,
        where_clause: &str,
    ) -> Result<Vec<Record>> {
        if !self.catalog.contains(table) {
            return Err(DbError::TableNotFound(table.to_string()));
        }

        let set = clause::parse_condition(set_clause)
            .ok_or_else(|| DbError::MalformedClause(set_clause.to_string()))?;
        let filter = clause::parse_condition(where_clause)
            .ok_or_else(|| DbError::MalformedClause(where_clause.to_string()))?;
        if set.column == ID_COLUMN {
            return Err(DbError::IdImmutable);
        }

        let set_value = coerce(
            &set.raw_value,
            self.catalog.column_type(table, &set.column),
        )?;
        let operand = coerce(
            &filter.raw_value,
            self.catalog.column_type(table, &filter.column),
        )?
        .to_string();

        let mut records = self.storage.load_records(table)?;
        let mut updated = 0usize;
        for record in records
            .iter_mut()
            .filter(|record| record.field_text(&filter.column) == operand)
        {
            record.set(&set.column, set_value.clone());
            updated += 1;
        }

        if updated == 0 {
            return Err(DbError::NoMatch(table.to_string()));
        }
        self.storage.save_records(table, &records)?;

        debug!(table, updated, "update finished");
        Ok(records)
    }

    /// Removes every record matching the filter, persists the kept subset,
    /// and returns it.
    ///
    /// # Errors
    /// [DbError::NoMatch] when nothing matched (storage is left untouched),
    /// plus the same clause and conversion failures as [Database::select].
    pub fn delete(&mut self, table: &str, where_clause: &str) -> Result<Vec<Record>> {
        if !self.catalog.contains(table) {
            return Err(DbError::TableNotFound(table.to_string()));
        }

        let filter = clause::parse_condition(where_clause)
            .ok_or_else(|| DbError::MalformedClause(where_clause.to_string()))?;
        let operand = coerce(
            &filter.raw_value,
            self.catalog.column_type(table, &filter.column),
        )?
        .to_string();

        let records = self.storage.load_records(table)?;
        let before = records.len();
        let kept: Vec<Record> = records
            .into_iter()
            .filter(|record| record.field_text(&filter.column) != operand)
            .collect();

        if kept.len() == before {
            return Err(DbError::NoMatch(table.to_string()));
        }
        self.storage.save_records(table, &kept)?;

        debug!(table, removed = before - kept.len(), "delete finished");
        Ok(kept)
    }

    /// Reports a table's name, columns, and live record count. Never served
    /// from the query cache.
    pub fn info(&self, table: &str) -> Result<TableInfo> {
        let columns = self.catalog.columns(table)?.to_vec();
        let records = self.storage.load_records(table)?;
        Ok(TableInfo {
            name: table.to_string(),
            columns,
            record_count: records.len(),
        })
    }
}
