//! Renders query plans to ClickHouse SQL.

mod to_sql;

pub use to_sql::{quote_string, InPlan, ToSql};

use crate::query_planner::QueryPlan;

pub fn generate_sql(plan: &QueryPlan) -> String {
    let sql = plan.to_sql();
    log::debug!("Generated SQL:\n{}", sql);
    sql
}
