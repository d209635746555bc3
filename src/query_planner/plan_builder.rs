//! Turns an entity request into a [`QueryPlan`].
//!
//! Planning is greedy and fully deterministic:
//!
//! 1. clean the requested columns and append the filter's columns
//! 2. assign columns to tables, add the target table, close the set under the
//!    bridge rules
//! 3. walk a join chain outward from the target table
//! 4. attach the filter predicate, projection and ordering
//!
//! Every validation error surfaces here, before any backend work starts.

use std::collections::BTreeMap;

use super::errors::QueryPlanError;
use super::query_plan::{JoinStep, JoinType, QueryPlan};
use crate::filters::Filter;
use crate::schema_catalog::{Feature, SchemaError, SchemaGraph, TableResolver};

pub struct QueryPlanBuilder<'a> {
    schema: &'a SchemaGraph,
}

impl<'a> QueryPlanBuilder<'a> {
    pub fn new(schema: &'a SchemaGraph) -> Self {
        QueryPlanBuilder { schema }
    }

    fn resolver(&self) -> TableResolver<'a> {
        TableResolver::new(self.schema)
    }

    /// Plan a query for one entity.
    ///
    /// `columns` defaults to every column of the entity's base table. The
    /// primary key is always selected, and asking for a start or end
    /// coordinate also selects the sequence name.
    pub fn plan_entity(
        &self,
        feature: Feature,
        columns: Option<&[String]>,
        filter: &Filter,
        join_type: JoinType,
    ) -> Result<QueryPlan, QueryPlanError> {
        let entity = self.schema.entity(feature)?;

        let mut cols: Vec<String> = match columns {
            Some(cols) => cols.to_vec(),
            None => self.resolver().list_columns(Some(&[entity.table.as_str()][..]))?,
        };

        if !cols.contains(&entity.primary_key) {
            cols.push(entity.primary_key.clone());
        }
        let wants_coordinates =
            cols.contains(&entity.start_column) || cols.contains(&entity.end_column);
        if wants_coordinates && !cols.contains(&entity.seq_name_column) {
            cols.push(entity.seq_name_column.clone());
        }

        self.build_query(&entity.table, &cols, filter, join_type)
    }

    pub fn build_query(
        &self,
        table: &str,
        columns: &[String],
        filter: &Filter,
        join_type: JoinType,
    ) -> Result<QueryPlan, QueryPlanError> {
        let resolver = self.resolver();
        if !self.schema.has_table(table) {
            return Err(SchemaError::InvalidTable {
                table: table.to_string(),
            }
            .into());
        }

        let filter = filter.bind(self.schema)?;
        let mut cols = resolver.clean_columns(columns)?;
        for col in filter.columns() {
            if !cols.contains(&col) {
                cols.push(col);
            }
        }

        let mut tables = resolver.tables_for_columns(&cols, None)?;
        if !tables.iter().any(|t| t == table) {
            tables.push(table.to_string());
        }
        let tables = resolver.get_required_tables(&tables);
        log::debug!("Required tables for `{}`: {:?}", table, tables);

        let joins = if tables.len() > 1 {
            self.join_chain(table, &tables)?
        } else {
            Vec::new()
        };

        let mut chain: Vec<&str> = vec![table];
        chain.extend(joins.iter().map(|j| j.table.as_str()));

        let predicate = filter.convert();
        let mut column_sources = BTreeMap::new();
        for column in cols.iter().cloned().chain(predicate.columns()) {
            if let Some(source) = chain
                .iter()
                .find(|t| self.schema.table(t).is_some_and(|s| s.has_column(&column)))
            {
                column_sources.insert(column, source.to_string());
            }
        }

        let order_by = self.order_by(&cols);

        Ok(QueryPlan {
            table: table.to_string(),
            columns: cols,
            tables,
            joins,
            join_type,
            filter: predicate,
            order_by,
            column_sources,
        })
    }

    /// Greedy join chain starting at `start`.
    ///
    /// At each step the first (edge, joined table, pending table) triple that
    /// the edge connects wins, scanning edges in declaration order, joined
    /// tables in join order and pending tables in priority order.
    pub fn join_chain(
        &self,
        start: &str,
        tables: &[String],
    ) -> Result<Vec<JoinStep>, QueryPlanError> {
        let mut joined: Vec<String> = vec![start.to_string()];
        let mut pending: Vec<String> = tables.iter().filter(|t| *t != start).cloned().collect();
        let mut steps = Vec::new();

        while !pending.is_empty() {
            let next = self.schema.join_edges().iter().find_map(|edge| {
                joined.iter().find_map(|j| {
                    pending
                        .iter()
                        .position(|p| edge.connects(j, p))
                        .map(|pos| (edge, pos))
                })
            });

            let Some((edge, pos)) = next else {
                return Err(QueryPlanError::DisconnectedJoin { joined, pending });
            };

            let table = pending.remove(pos);
            let left_table = joined
                .iter()
                .find(|t| self.schema.table(t).is_some_and(|s| s.has_column(&edge.key)))
                .cloned()
                .unwrap_or_else(|| start.to_string());

            log::debug!(
                "Joining `{}` on `{}` (left side `{}`)",
                table,
                edge.key,
                left_table
            );
            steps.push(JoinStep {
                table: table.clone(),
                key: edge.key.clone(),
                left_table,
            });
            joined.push(table);
        }

        Ok(steps)
    }

    /// Sequence name, then the first entity start coordinate present, then
    /// identifier-like columns in column order.
    fn order_by(&self, columns: &[String]) -> Vec<String> {
        fn push(col: &String, order_by: &mut Vec<String>) {
            if !order_by.contains(col) {
                order_by.push(col.clone());
            }
        }

        let mut order_by: Vec<String> = Vec::new();

        let seq_names = self.schema.entities().iter().map(|e| &e.seq_name_column);
        for seq_name in seq_names {
            if columns.contains(seq_name) {
                push(seq_name, &mut order_by);
            }
        }

        let mut starts: Vec<&String> = Vec::new();
        for feature in [Feature::Gene, Feature::Transcript, Feature::Exon] {
            if let Ok(entity) = self.schema.entity(feature) {
                starts.push(&entity.start_column);
            }
        }
        if let Some(start) = starts.into_iter().find(|s| columns.contains(s)) {
            push(start, &mut order_by);
        }

        for col in columns.iter().filter(|c| c.contains("id")) {
            push(col, &mut order_by);
        }

        order_by
    }
}
