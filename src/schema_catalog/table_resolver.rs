use std::collections::{BTreeSet, HashSet};

use super::errors::SchemaError;
use super::schema_graph::SchemaGraph;

/// Resolves requested columns to the set of tables a query must touch.
///
/// All decisions are made from the static [`SchemaGraph`]; the live database
/// is never consulted.
pub struct TableResolver<'a> {
    schema: &'a SchemaGraph,
}

impl<'a> TableResolver<'a> {
    pub fn new(schema: &'a SchemaGraph) -> Self {
        TableResolver { schema }
    }

    /// Columns of the given tables (all tables when `None`), in schema order.
    ///
    /// Shared key columns are reported once per table that carries them.
    pub fn list_columns(&self, tables: Option<&[&str]>) -> Result<Vec<String>, SchemaError> {
        match tables {
            None => Ok(self
                .schema
                .tables()
                .iter()
                .flat_map(|t| t.columns.iter().cloned())
                .collect()),
            Some(names) => {
                let mut columns = Vec::new();
                for name in names {
                    let table = self.schema.table(name).ok_or_else(|| SchemaError::InvalidTable {
                        table: name.to_string(),
                    })?;
                    columns.extend(table.columns.iter().cloned());
                }
                Ok(columns)
            }
        }
    }

    /// Validate `columns` against every known column.
    ///
    /// Returns the valid columns deduplicated in request order. Fails naming
    /// every unknown column, or when nothing valid remains.
    pub fn clean_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<Vec<String>, SchemaError> {
        let mut seen = HashSet::new();
        let mut cleaned = Vec::new();
        let mut invalid = Vec::new();

        for column in columns {
            let column = column.as_ref();
            if !self.schema.has_column(column) {
                if !invalid.iter().any(|c| c == column) {
                    invalid.push(column.to_string());
                }
            } else if seen.insert(column) {
                cleaned.push(column.to_string());
            }
        }

        if !invalid.is_empty() {
            return Err(SchemaError::InvalidColumns { columns: invalid });
        }
        if cleaned.is_empty() {
            return Err(SchemaError::NoValidColumns);
        }
        Ok(cleaned)
    }

    /// Sort tables by traversal priority (all tables when `None`).
    ///
    /// Names missing from the schema are dropped with a warning.
    pub fn tables_by_priority(&self, subset: Option<&[&str]>) -> Vec<String> {
        let mut tables: Vec<&str> = match subset {
            None => self.schema.table_names(),
            Some(names) => {
                let missing: Vec<&str> = names
                    .iter()
                    .copied()
                    .filter(|t| !self.schema.has_table(t))
                    .collect();
                if !missing.is_empty() {
                    log::warn!(
                        "The following tables are not in the database: {}.",
                        missing.join(", ")
                    );
                }
                let mut kept: Vec<&str> = Vec::new();
                for name in names {
                    if self.schema.has_table(name) && !kept.contains(name) {
                        kept.push(*name);
                    }
                }
                kept
            }
        };

        tables.sort_by_key(|t| self.schema.priority(t).unwrap_or(u32::MAX));
        tables.into_iter().map(str::to_string).collect()
    }

    /// Greedy column-to-table assignment.
    ///
    /// Tables are visited in priority order, `start_with` first when given.
    /// As soon as one table holds every remaining column it is appended and
    /// the walk stops; otherwise each table claims the columns it carries.
    pub fn tables_for_columns<S: AsRef<str>>(
        &self,
        columns: &[S],
        start_with: Option<&str>,
    ) -> Result<Vec<String>, SchemaError> {
        let mut remaining = self.clean_columns(columns)?;
        let mut order = self.tables_by_priority(None);

        if let Some(start) = start_with {
            let pos = order
                .iter()
                .position(|t| t == start)
                .ok_or_else(|| SchemaError::InvalidTable {
                    table: start.to_string(),
                })?;
            let start = order.remove(pos);
            order.insert(0, start);
        }

        let mut tables: Vec<String> = Vec::new();
        for name in order {
            let Some(table) = self.schema.table(&name) else {
                continue;
            };
            if remaining.iter().all(|c| table.has_column(c)) {
                tables.push(name);
                return Ok(tables);
            }
            let before = remaining.len();
            remaining.retain(|c| !table.has_column(c));
            if remaining.len() < before {
                tables.push(name);
            }
        }
        Ok(tables)
    }

    /// Close a table set under the bridge rules and sort it by priority.
    ///
    /// Rules are re-applied until no rule adds a new table, so tables injected
    /// by one rule can trigger another.
    pub fn get_required_tables<S: AsRef<str>>(&self, tables: &[S]) -> Vec<String> {
        let mut required: BTreeSet<String> =
            tables.iter().map(|t| t.as_ref().to_string()).collect();

        loop {
            let added: Vec<String> = self
                .schema
                .bridge_rules()
                .iter()
                .filter(|rule| !required.contains(&rule.add) && rule.applies_to(&required))
                .map(|rule| rule.add.clone())
                .collect();
            if added.is_empty() {
                break;
            }
            for table in added {
                log::debug!("Adding bridge table `{}`", table);
                required.insert(table);
            }
        }

        let names: Vec<&str> = required.iter().map(String::as_str).collect();
        self.tables_by_priority(Some(names.as_slice()))
    }
}
