use crate::query_planner::logical_expr::{Literal, Predicate};
use crate::query_planner::query_plan::{JoinStep, JoinType, QueryPlan};

pub trait ToSql {
    fn to_sql(&self) -> String;
}

/// Quote a string literal for ClickHouse
pub fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

impl ToSql for Literal {
    fn to_sql(&self) -> String {
        match self {
            Literal::Integer(i) => i.to_string(),
            Literal::String(s) => quote_string(s),
        }
    }
}

impl ToSql for JoinType {
    fn to_sql(&self) -> String {
        match self {
            JoinType::Inner => "INNER JOIN".to_string(),
            JoinType::Left => "LEFT JOIN".to_string(),
        }
    }
}

/// A node rendered in the context of a plan, so columns can be qualified
/// with the table they are read from.
pub struct InPlan<'a, T> {
    pub node: &'a T,
    pub plan: &'a QueryPlan,
}

impl<'a, T> InPlan<'a, T> {
    pub fn new(node: &'a T, plan: &'a QueryPlan) -> Self {
        InPlan { node, plan }
    }

    fn column(&self, column: &str) -> String {
        format!("{}.{}", self.plan.source_of(column), column)
    }
}

impl ToSql for InPlan<'_, Predicate> {
    fn to_sql(&self) -> String {
        let nested = |p: &Predicate| InPlan::new(p, self.plan).to_sql();
        match self.node {
            Predicate::True => "1".to_string(),
            Predicate::Comparison {
                column,
                operator,
                value,
            } => format!("{} {} {}", self.column(column), operator.symbol(), value.to_sql()),
            Predicate::InList { column, values } => {
                let values: Vec<String> = values.iter().map(ToSql::to_sql).collect();
                format!("{} IN ({})", self.column(column), values.join(", "))
            }
            Predicate::Between { column, low, high } => format!(
                "{} BETWEEN {} AND {}",
                self.column(column),
                low.to_sql(),
                high.to_sql()
            ),
            Predicate::And(l, r) => format!("({} AND {})", nested(&**l), nested(&**r)),
            Predicate::Or(l, r) => format!("({} OR {})", nested(&**l), nested(&**r)),
            Predicate::Not(inner) => format!("NOT ({})", nested(&**inner)),
        }
    }
}

impl ToSql for InPlan<'_, JoinStep> {
    fn to_sql(&self) -> String {
        format!(
            "{} {} AS {} ON {}.{} = {}.{}\n",
            self.plan.join_type.to_sql(),
            self.node.table,
            self.node.table,
            self.node.left_table,
            self.node.key,
            self.node.table,
            self.node.key
        )
    }
}

impl ToSql for QueryPlan {
    fn to_sql(&self) -> String {
        let mut sql = String::new();

        let select: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{}.{} AS {}", self.source_of(c), c, c))
            .collect();
        sql.push_str(&format!("SELECT DISTINCT {}\n", select.join(", ")));
        sql.push_str(&format!("FROM {} AS {}\n", self.table, self.table));

        for join in &self.joins {
            sql.push_str(&InPlan::new(join, self).to_sql());
        }

        if !self.filter.is_true() {
            sql.push_str(&format!("WHERE {}\n", InPlan::new(&self.filter, self).to_sql()));
        }

        if !self.order_by.is_empty() {
            let items: Vec<String> = self
                .order_by
                .iter()
                .map(|c| format!("{} ASC NULLS LAST", c))
                .collect();
            sql.push_str(&format!("ORDER BY {}\n", items.join(", ")));
        }

        sql
    }
}
