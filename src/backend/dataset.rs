//! Dataset dumps for the memory backend.
//!
//! A dump lists every table with its columns and rows:
//!
//! ```yaml
//! tables:
//!   - name: gene
//!     columns: [gene_id, gene_name]
//!     rows:
//!       - [ENSG00000000001, ALPHA]
//! ```
//!
//! JSON files use the same shape. Cells must be scalars; booleans load as
//! 0/1 the way SQLite stores them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::frame::Value;
use super::memory::MemoryBackend;
use super::BackendError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetTable {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub tables: Vec<DatasetTable>,
}

impl Dataset {
    /// Read a dump; `.yaml`/`.yml` files are parsed as YAML, anything else as JSON
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BackendError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::from_yaml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, BackendError> {
        serde_json::from_str(json).map_err(|e| BackendError::Parse(e.to_string()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, BackendError> {
        serde_yaml::from_str(yaml).map_err(|e| BackendError::Parse(e.to_string()))
    }

    pub fn into_backend(self) -> Result<MemoryBackend, BackendError> {
        let mut backend = MemoryBackend::new();
        for table in self.tables {
            let mut rows = Vec::with_capacity(table.rows.len());
            for raw in &table.rows {
                let mut row = Vec::with_capacity(raw.len());
                for (idx, cell) in raw.iter().enumerate() {
                    let value = Value::from_json(cell).ok_or_else(|| BackendError::UnsupportedValue {
                        table: table.name.clone(),
                        column: table
                            .columns
                            .get(idx)
                            .cloned()
                            .unwrap_or_else(|| format!("#{}", idx)),
                        value: cell.to_string(),
                    })?;
                    row.push(value);
                }
                rows.push(row);
            }
            backend.add_table(&table.name, table.columns, rows)?;
        }
        Ok(backend)
    }
}
