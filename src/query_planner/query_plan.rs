use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::errors::QueryPlanError;
use super::logical_expr::Predicate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    /// Drops rows without a key match
    #[default]
    Inner,
    /// Keeps every left row; unmatched right columns are null
    Left,
}

impl FromStr for JoinType {
    type Err = QueryPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inner" => Ok(JoinType::Inner),
            "left" => Ok(JoinType::Left),
            other => Err(QueryPlanError::InvalidJoinType {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "inner"),
            JoinType::Left => write!(f, "left"),
        }
    }
}

/// One join in the chain: `table` is attached on `key`, matched against the
/// left-most already-joined table that carries the key (`left_table`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStep {
    pub table: String,
    pub key: String,
    pub left_table: String,
}

/// Everything a backend needs to run one entity query.
///
/// Built per call by [`super::plan_builder::QueryPlanBuilder`] and discarded
/// after execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    /// Start table of the join chain
    pub table: String,
    /// Output columns, deduplicated, in output order
    pub columns: Vec<String>,
    /// Every table the query touches, in priority order
    pub tables: Vec<String>,
    pub joins: Vec<JoinStep>,
    pub join_type: JoinType,
    pub filter: Predicate,
    pub order_by: Vec<String>,
    /// Table each referenced column is read from (left-most carrier in the chain)
    pub column_sources: BTreeMap<String, String>,
}

impl QueryPlan {
    pub fn is_single_table(&self) -> bool {
        self.joins.is_empty()
    }

    /// Tables in join order, start table first
    pub fn chain(&self) -> Vec<&str> {
        std::iter::once(self.table.as_str())
            .chain(self.joins.iter().map(|j| j.table.as_str()))
            .collect()
    }

    pub fn source_of(&self, column: &str) -> &str {
        self.column_sources
            .get(column)
            .map(String::as_str)
            .unwrap_or(self.table.as_str())
    }
}
