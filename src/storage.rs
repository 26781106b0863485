//! Persistence collaborators: the contract the engine depends on and the
//! flat-file JSON implementation of it.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::Result;
use crate::record::Record;
use crate::schema::Catalog;

/// Storage contract required by the engine: one schema document for the
/// whole catalog and one contents document per table. Every operation
/// reads or rewrites a document as a unit; there is no partial update.
pub trait Storage {
    /// Loads the schema document. A missing document yields an empty
    /// catalog, not an error.
    fn load_catalog(&self) -> Result<Catalog>;

    /// Rewrites the schema document.
    fn save_catalog(&self, catalog: &Catalog) -> Result<()>;

    /// Loads the full record set of a table. A missing document yields an
    /// empty set, not an error.
    fn load_records(&self, table: &str) -> Result<Vec<Record>>;

    /// Rewrites the full record set of a table.
    fn save_records(&self, table: &str, records: &[Record]) -> Result<()>;
}

const META_FILE: &str = "db_meta.json";
const DATA_DIR: &str = "data";

/// File-backed storage: `db_meta.json` for the schema and one
/// `data/<table>.json` document per table, all pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn meta_path(&self) -> PathBuf {
        self.root.join(META_FILE)
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(DATA_DIR).join(format!("{table}.json"))
    }
}

impl Storage for JsonStorage {
    fn load_catalog(&self) -> Result<Catalog> {
        match fs::read_to_string(self.meta_path()) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Catalog::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save_catalog(&self, catalog: &Catalog) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.meta_path(), serde_json::to_string_pretty(catalog)?)?;
        Ok(())
    }

    fn load_records(&self, table: &str) -> Result<Vec<Record>> {
        match fs::read_to_string(self.table_path(table)) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save_records(&self, table: &str, records: &[Record]) -> Result<()> {
        fs::create_dir_all(self.root.join(DATA_DIR))?;
        fs::write(
            self.table_path(table),
            serde_json::to_string_pretty(&records)?,
        )?;
        Ok(())
    }
}
