//! Schema graph configuration management.
//!
//! Alternative schema graphs are described in YAML (or JSON, which the YAML
//! parser also accepts) with the following structure:
//!
//! ```yaml
//! name: mini_ensdb
//! tables:
//!   - name: gene
//!     priority: 1
//!     columns: [gene_id, gene_name, gene_seq_start, gene_seq_end, seq_name]
//!   - name: tx
//!     priority: 2
//!     columns: [tx_id, gene_id]
//!   - name: chromosome
//!     priority: 3
//!     columns: [seq_name, seq_length]
//! join_edges:
//!   - { left: gene, right: tx, key: gene_id }
//!   - { left: gene, right: chromosome, key: seq_name }
//! bridge_rules:
//!   - family: [chromosome]
//!     partner: { kind: any_other }
//!     add: gene
//! entities:
//!   - feature: gene
//!     table: gene
//!     primary_key: gene_id
//!     start_column: gene_seq_start
//!     end_column: gene_seq_end
//!     seq_name_column: seq_name
//! ```
//!
//! A configuration is structurally validated before it becomes a
//! [`SchemaGraph`]; validation against a live backend lives in
//! [`super::schema_validator`].

use super::errors::SchemaError;
use super::schema_graph::{BridgeRule, EntitySchema, JoinEdge, SchemaGraph, TableSchema};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaGraphConfig {
    pub name: String,
    pub tables: Vec<TableSchema>,
    #[serde(default)]
    pub join_edges: Vec<JoinEdge>,
    #[serde(default)]
    pub bridge_rules: Vec<BridgeRule>,
    #[serde(default)]
    pub entities: Vec<EntitySchema>,
}

impl SchemaGraphConfig {
    /// Load schema graph configuration from a YAML or JSON file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path).map_err(|e| SchemaError::ConfigReadError {
            error: e.to_string(),
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Parse schema graph configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        serde_yaml::from_str(yaml).map_err(|e| SchemaError::ConfigParseError {
            error: e.to_string(),
        })
    }

    /// Snapshot of an existing graph, e.g. to dump the built-in schema
    pub fn from_schema_graph(schema: &SchemaGraph) -> Self {
        SchemaGraphConfig {
            name: schema.name().to_string(),
            tables: schema.tables().to_vec(),
            join_edges: schema.join_edges().to_vec(),
            bridge_rules: schema.bridge_rules().to_vec(),
            entities: schema.entities().to_vec(),
        }
    }

    fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Structural validation of the configuration
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.tables.is_empty() {
            return Err(SchemaError::InvalidConfig {
                message: "Schema must contain at least one table definition".to_string(),
            });
        }

        let mut seen_tables = HashSet::new();
        for table in &self.tables {
            if !seen_tables.insert(table.name.as_str()) {
                return Err(SchemaError::InvalidConfig {
                    message: format!("Duplicate table: {}", table.name),
                });
            }
            if table.columns.is_empty() {
                return Err(SchemaError::config_error_with_context(
                    format!("table `{}`", table.name),
                    "table declares no columns",
                ));
            }
        }

        for edge in &self.join_edges {
            let element = format!("join edge {}-{}", edge.left, edge.right);
            for side in [&edge.left, &edge.right] {
                let table = self.table(side).ok_or_else(|| {
                    SchemaError::config_error_with_context(
                        element.clone(),
                        format!("unknown table `{}`", side),
                    )
                })?;
                if !table.has_column(&edge.key) {
                    return Err(SchemaError::config_error_with_context(
                        element,
                        format!("key column `{}` missing from table `{}`", edge.key, side),
                    ));
                }
            }
        }

        for rule in &self.bridge_rules {
            if rule.family.is_empty() {
                return Err(SchemaError::config_error_with_context(
                    format!("bridge rule adding `{}`", rule.add),
                    "rule family is empty",
                ));
            }
            if let Some(unknown) = rule
                .referenced_tables()
                .into_iter()
                .find(|t| self.table(t).is_none())
            {
                return Err(SchemaError::config_error_with_context(
                    format!("bridge rule adding `{}`", rule.add),
                    format!("unknown table `{}`", unknown),
                ));
            }
        }

        let mut seen_entities = HashSet::new();
        for entity in &self.entities {
            let element = format!("entity `{}`", entity.feature);
            if !seen_entities.insert(entity.feature) {
                return Err(SchemaError::InvalidConfig {
                    message: format!("Duplicate entity: {}", entity.feature),
                });
            }
            let table = self.table(&entity.table).ok_or_else(|| {
                SchemaError::config_error_with_context(
                    element.clone(),
                    format!("unknown table `{}`", entity.table),
                )
            })?;
            for column in [&entity.primary_key, &entity.start_column, &entity.end_column] {
                if !table.has_column(column) {
                    return Err(SchemaError::config_error_with_context(
                        element,
                        format!("column `{}` missing from table `{}`", column, table.name),
                    ));
                }
            }
            // The sequence name may come from a joined table (tx reads it from gene)
            if !self
                .tables
                .iter()
                .any(|t| t.has_column(&entity.seq_name_column))
            {
                return Err(SchemaError::config_error_with_context(
                    element,
                    format!(
                        "column `{}` missing from every table",
                        entity.seq_name_column
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Convert to an immutable [`SchemaGraph`]
    pub fn to_schema_graph(&self) -> Result<SchemaGraph, SchemaError> {
        self.validate()?;

        log::debug!(
            "Loaded schema graph '{}': {} tables, {} join edges, {} bridge rules",
            self.name,
            self.tables.len(),
            self.join_edges.len(),
            self.bridge_rules.len()
        );

        Ok(SchemaGraph::from_parts(
            self.name.clone(),
            self.tables.clone(),
            self.join_edges.clone(),
            self.bridge_rules.clone(),
            self.entities.clone(),
        ))
    }
}
