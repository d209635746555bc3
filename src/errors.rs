use thiserror::Error;

use crate::backend::BackendError;
use crate::config::ConfigError;
use crate::filters::FilterError;
use crate::query_planner::QueryPlanError;
use crate::schema_catalog::SchemaError;

/// Top-level error returned by [`crate::AnnotationDb`]
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    QueryPlan(#[from] QueryPlanError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AnnotationError {
    /// Whether the request was rejected before touching the database
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AnnotationError::Filter(_)
                | AnnotationError::QueryPlan(_)
                | AnnotationError::Schema(
                    SchemaError::InvalidColumns { .. }
                        | SchemaError::NoValidColumns
                        | SchemaError::InvalidTable { .. }
                        | SchemaError::UnknownEntity { .. }
                )
        )
    }
}
