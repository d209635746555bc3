use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::errors::SchemaError;

/// A genomic feature type backed by one base table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Gene,
    Transcript,
    Exon,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Gene => "gene",
            Feature::Transcript => "transcript",
            Feature::Exon => "exon",
        }
    }

    /// Interval columns `(start, end)` of this feature in the Ensembl layout
    pub fn coordinate_columns(&self) -> (&'static str, &'static str) {
        match self {
            Feature::Gene => ("gene_seq_start", "gene_seq_end"),
            Feature::Transcript => ("tx_seq_start", "tx_seq_end"),
            Feature::Exon => ("exon_seq_start", "exon_seq_end"),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gene" | "genes" => Ok(Feature::Gene),
            "transcript" | "transcripts" | "tx" => Ok(Feature::Transcript),
            "exon" | "exons" => Ok(Feature::Exon),
            other => Err(SchemaError::UnknownEntity {
                entity: other.to_string(),
            }),
        }
    }
}

/// A relation in the schema graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    /// Traversal rank; lower values are visited first
    pub priority: u32,
    pub columns: Vec<String>,
}

impl TableSchema {
    pub fn new(name: &str, priority: u32, columns: &[&str]) -> Self {
        TableSchema {
            name: name.to_string(),
            priority,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Direct join relationship between two tables on a shared key column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinEdge {
    pub left: String,
    pub right: String,
    pub key: String,
}

impl JoinEdge {
    pub fn new(left: &str, right: &str, key: &str) -> Self {
        JoinEdge {
            left: left.to_string(),
            right: right.to_string(),
            key: key.to_string(),
        }
    }

    /// True when this edge joins `a` and `b`, in either direction
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.left == a && self.right == b) || (self.left == b && self.right == a)
    }
}

/// Which other tables must be present for a bridge rule to fire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tables", rename_all = "snake_case")]
pub enum Partner {
    /// Any table outside the rule's family
    AnyOther,
    /// Any of the listed tables
    AnyOf(Vec<String>),
    /// Any table not in the list
    NoneOf(Vec<String>),
}

/// Injects `add` when a family table is requested together with a partner table.
///
/// Example: `{exon, tx2exon} + gene => tx`: exons only reach genes through
/// transcripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeRule {
    pub family: Vec<String>,
    pub partner: Partner,
    pub add: String,
}

impl BridgeRule {
    pub fn new(family: &[&str], partner: Partner, add: &str) -> Self {
        BridgeRule {
            family: family.iter().map(|t| t.to_string()).collect(),
            partner,
            add: add.to_string(),
        }
    }

    pub fn applies_to(&self, tables: &BTreeSet<String>) -> bool {
        let in_family = |t: &String| self.family.contains(t);
        if !tables.iter().any(in_family) {
            return false;
        }
        match &self.partner {
            Partner::AnyOther => tables.iter().any(|t| !in_family(t)),
            Partner::AnyOf(partners) => tables.iter().any(|t| partners.contains(t)),
            Partner::NoneOf(excluded) => tables.iter().any(|t| !excluded.contains(t)),
        }
    }

    /// Every table name the rule mentions
    pub fn referenced_tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.family.iter().map(String::as_str).collect();
        match &self.partner {
            Partner::AnyOther => {}
            Partner::AnyOf(tables) | Partner::NoneOf(tables) => {
                names.extend(tables.iter().map(String::as_str))
            }
        }
        names.push(&self.add);
        names
    }
}

/// Base table and key columns of a queryable entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub feature: Feature,
    pub table: String,
    pub primary_key: String,
    pub start_column: String,
    pub end_column: String,
    pub seq_name_column: String,
}

impl EntitySchema {
    pub fn new(
        feature: Feature,
        table: &str,
        primary_key: &str,
        seq_name_column: &str,
    ) -> Self {
        let (start, end) = feature.coordinate_columns();
        EntitySchema {
            feature,
            table: table.to_string(),
            primary_key: primary_key.to_string(),
            start_column: start.to_string(),
            end_column: end.to_string(),
            seq_name_column: seq_name_column.to_string(),
        }
    }
}

/// Immutable description of the annotation database: tables, their
/// traversal priority, join edges, bridge rules and entity definitions.
///
/// Built once (see [`SchemaGraph::ensembl`] or
/// [`super::config::SchemaGraphConfig::to_schema_graph`]) and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaGraph {
    name: String,
    tables: Vec<TableSchema>,
    join_edges: Vec<JoinEdge>,
    bridge_rules: Vec<BridgeRule>,
    entities: Vec<EntitySchema>,
}

impl SchemaGraph {
    /// Assemble a graph from parts that were already validated
    pub(crate) fn from_parts(
        name: String,
        tables: Vec<TableSchema>,
        join_edges: Vec<JoinEdge>,
        bridge_rules: Vec<BridgeRule>,
        entities: Vec<EntitySchema>,
    ) -> Self {
        SchemaGraph {
            name,
            tables,
            join_edges,
            bridge_rules,
            entities,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tables in declaration order
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    pub fn priority(&self, name: &str) -> Option<u32> {
        self.table(name).map(|t| t.priority)
    }

    pub fn join_edges(&self) -> &[JoinEdge] {
        &self.join_edges
    }

    pub fn bridge_rules(&self) -> &[BridgeRule] {
        &self.bridge_rules
    }

    pub fn entities(&self) -> &[EntitySchema] {
        &self.entities
    }

    pub fn entity(&self, feature: Feature) -> Result<&EntitySchema, SchemaError> {
        self.entities
            .iter()
            .find(|e| e.feature == feature)
            .ok_or_else(|| SchemaError::UnknownEntity {
                entity: feature.to_string(),
            })
    }

    /// Every known column name, each reported once
    pub fn all_columns(&self) -> BTreeSet<&str> {
        self.tables
            .iter()
            .flat_map(|t| t.columns.iter().map(String::as_str))
            .collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.tables.iter().any(|t| t.has_column(column))
    }
}
