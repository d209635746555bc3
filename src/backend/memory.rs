use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::dataset::Dataset;
use super::frame::{Frame, Value};
use super::{Backend, BackendError};
use crate::query_planner::logical_expr::{Literal, Predicate};
use crate::query_planner::{JoinStep, JoinType, QueryPlan};

/// In-process relational executor over fully loaded tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    tables: BTreeMap<String, Frame>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON or YAML dataset dump
    pub fn from_dataset_file<P: AsRef<Path>>(path: P) -> Result<Self, BackendError> {
        Dataset::from_file(path)?.into_backend()
    }

    pub fn add_table(
        &mut self,
        name: &str,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    ) -> Result<(), BackendError> {
        if self.tables.contains_key(name) {
            return Err(BackendError::DuplicateTable {
                table: name.to_string(),
            });
        }
        if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(BackendError::RowWidth {
                table: name.to_string(),
                row,
                expected: columns.len(),
                actual: values.len(),
            });
        }
        log::debug!("Loaded table `{}` ({} rows)", name, rows.len());
        self.tables
            .insert(name.to_string(), Frame::new(columns, rows));
        Ok(())
    }

    fn table(&self, name: &str) -> Result<&Frame, BackendError> {
        self.tables.get(name).ok_or_else(|| BackendError::TableNotFound {
            table: name.to_string(),
        })
    }

    fn join(
        &self,
        left: Frame,
        step: &JoinStep,
        join_type: JoinType,
    ) -> Result<Frame, BackendError> {
        let right = self.table(&step.table)?;
        let left_key = left
            .column_index(&step.key)
            .ok_or_else(|| BackendError::ColumnNotFound {
                column: step.key.clone(),
                table: step.left_table.clone(),
            })?;
        let right_key = right
            .column_index(&step.key)
            .ok_or_else(|| BackendError::ColumnNotFound {
                column: step.key.clone(),
                table: step.table.clone(),
            })?;

        // Right-hand columns keep their name unless it collides, then get `_y`
        let mut columns: Vec<String> = left.columns().to_vec();
        let mut right_indices = Vec::new();
        for (idx, name) in right.columns().iter().enumerate() {
            if idx == right_key {
                continue;
            }
            let mut out = name.clone();
            while columns.contains(&out) {
                out.push_str("_y");
            }
            columns.push(out);
            right_indices.push(idx);
        }

        let mut index: HashMap<&Value, Vec<usize>> = HashMap::new();
        for (i, row) in right.rows().iter().enumerate() {
            let key = &row[right_key];
            if !key.is_null() {
                index.entry(key).or_default().push(i);
            }
        }

        let mut rows = Vec::new();
        let mut unmatched = 0usize;
        for row in left.into_rows() {
            let key = &row[left_key];
            let matches = if key.is_null() { None } else { index.get(key) };
            match matches {
                Some(matches) => {
                    for &m in matches {
                        let mut joined = row.clone();
                        joined.extend(right_indices.iter().map(|&i| right.rows()[m][i].clone()));
                        rows.push(joined);
                    }
                }
                None => {
                    unmatched += 1;
                    if join_type == JoinType::Left {
                        let mut joined = row;
                        joined.extend(right_indices.iter().map(|_| Value::Null));
                        rows.push(joined);
                    }
                }
            }
        }

        if unmatched > 0 {
            match join_type {
                JoinType::Left => log::info!(
                    "{} rows without a match in `{}` on `{}` (kept with nulls)",
                    unmatched,
                    step.table,
                    step.key
                ),
                JoinType::Inner => log::debug!(
                    "{} rows without a match in `{}` on `{}` dropped",
                    unmatched,
                    step.table,
                    step.key
                ),
            }
        }

        Ok(Frame::new(columns, rows))
    }
}

impl Backend for MemoryBackend {
    fn list_tables(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.tables.keys().cloned().collect())
    }

    fn table_columns(&self, table: &str) -> Result<Vec<String>, BackendError> {
        Ok(self.table(table)?.columns().to_vec())
    }

    fn scan(&self, table: &str) -> Result<Frame, BackendError> {
        Ok(self.table(table)?.clone())
    }

    fn execute(&self, plan: &QueryPlan) -> Result<Frame, BackendError> {
        let mut frame = self.scan(&plan.table)?;
        for step in &plan.joins {
            frame = self.join(frame, step, plan.join_type)?;
        }

        let lookup = |column: &str| {
            frame
                .column_index(column)
                .ok_or_else(|| BackendError::ColumnNotFound {
                    column: column.to_string(),
                    table: plan.source_of(column).to_string(),
                })
        };

        let filter_columns: HashMap<String, usize> = plan
            .filter
            .columns()
            .into_iter()
            .map(|c| lookup(&c).map(|idx| (c, idx)))
            .collect::<Result<_, _>>()?;
        let projection: Vec<usize> = plan
            .columns
            .iter()
            .map(|c| lookup(c))
            .collect::<Result<_, _>>()?;

        let before = frame.num_rows();
        let rows: Vec<Vec<Value>> = frame
            .into_rows()
            .into_iter()
            .filter(|row| evaluate(&plan.filter, row, &filter_columns) == Some(true))
            .map(|row| projection.iter().map(|&i| row[i].clone()).collect())
            .collect();
        log::debug!("Filter kept {} of {} rows", rows.len(), before);

        let mut result = Frame::new(plan.columns.clone(), rows).distinct();
        result.sort_by_columns(&plan.order_by);
        Ok(result)
    }
}

/// SQL three-valued evaluation: `None` is unknown
fn evaluate(predicate: &Predicate, row: &[Value], columns: &HashMap<String, usize>) -> Option<bool> {
    let cell = |column: &String| columns.get(column).map(|&i| &row[i]);
    match predicate {
        Predicate::True => Some(true),
        Predicate::Comparison {
            column,
            operator,
            value,
        } => cell(column)?
            .compare_literal(value)
            .map(|o| operator.accepts(o)),
        Predicate::InList { column, values } => in_list(cell(column)?, values),
        Predicate::Between { column, low, high } => {
            let value = cell(column)?;
            let above = value.compare_literal(low).map(|o| o.is_ge());
            let below = value.compare_literal(high).map(|o| o.is_le());
            and(above, below)
        }
        Predicate::And(l, r) => and(evaluate(l, row, columns), evaluate(r, row, columns)),
        Predicate::Or(l, r) => or(evaluate(l, row, columns), evaluate(r, row, columns)),
        Predicate::Not(inner) => evaluate(inner, row, columns).map(|b| !b),
    }
}

fn in_list(value: &Value, values: &[Literal]) -> Option<bool> {
    let mut unknown = false;
    for literal in values {
        match value.compare_literal(literal) {
            Some(o) if o.is_eq() => return Some(true),
            Some(_) => {}
            None => unknown = true,
        }
    }
    if unknown {
        None
    } else {
        Some(false)
    }
}

fn and(l: Option<bool>, r: Option<bool>) -> Option<bool> {
    match (l, r) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

fn or(l: Option<bool>, r: Option<bool>) -> Option<bool> {
    match (l, r) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), Some(false)) => Some(false),
        _ => None,
    }
}
