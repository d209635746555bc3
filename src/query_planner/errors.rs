use thiserror::Error;

use crate::schema_catalog::SchemaError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryPlanError {
    #[error("Invalid join type: `{value}` (expected `inner` or `left`)")]
    InvalidJoinType { value: String },
    #[error("Failed to find match for tables: {joined:?} and {pending:?}")]
    DisconnectedJoin {
        joined: Vec<String>,
        pending: Vec<String>,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
