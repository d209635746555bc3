pub mod errors;
pub mod logical_expr;
pub mod plan_builder;
pub mod query_plan;

pub use errors::QueryPlanError;
pub use logical_expr::{Literal, Operator, Predicate};
pub use plan_builder::QueryPlanBuilder;
pub use query_plan::{JoinStep, JoinType, QueryPlan};
