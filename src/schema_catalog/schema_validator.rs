//! Validation of a schema graph against the tables a backend actually holds.
//!
//! Ensures that every table declared in the schema exists in the database and
//! carries every declared column. Column listings are cached per validator so
//! each table is inspected once.

use std::collections::{HashMap, HashSet};

use super::errors::SchemaError;
use super::schema_graph::SchemaGraph;
use crate::backend::Backend;

pub struct SchemaValidator<'a, B: Backend + ?Sized> {
    backend: &'a B,
    column_cache: HashMap<String, Vec<String>>,
}

impl<'a, B: Backend + ?Sized> SchemaValidator<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        SchemaValidator {
            backend,
            column_cache: HashMap::new(),
        }
    }

    /// Get the column names of a table, using the cache if available
    fn get_table_columns(&mut self, table: &str) -> Result<Vec<String>, SchemaError> {
        if let Some(columns) = self.column_cache.get(table) {
            return Ok(columns.clone());
        }

        let columns = self
            .backend
            .table_columns(table)
            .map_err(|e| SchemaError::BackendUnavailable {
                error: e.to_string(),
            })?;
        self.column_cache.insert(table.to_string(), columns.clone());
        Ok(columns)
    }

    /// Check every schema table and column against the backend
    pub fn validate(&mut self, schema: &SchemaGraph) -> Result<(), SchemaError> {
        let existing: HashSet<String> = self
            .backend
            .list_tables()
            .map_err(|e| SchemaError::BackendUnavailable {
                error: e.to_string(),
            })?
            .into_iter()
            .collect();

        for table in schema.tables() {
            if !existing.contains(&table.name) {
                return Err(SchemaError::MissingBackendTable {
                    table: table.name.clone(),
                });
            }

            let columns = self.get_table_columns(&table.name)?;
            if let Some(missing) = table.columns.iter().find(|c| !columns.contains(c)) {
                return Err(SchemaError::MissingBackendColumn {
                    column: missing.clone(),
                    table: table.name.clone(),
                });
            }
        }

        log::info!(
            "Schema '{}' validated against backend ({} tables)",
            schema.name(),
            schema.tables().len()
        );
        Ok(())
    }
}
