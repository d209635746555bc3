//! Storage backends that execute query plans.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryBackend`]: an in-process relational executor over tables loaded
//!   from a dataset dump (JSON or YAML)
//! - [`ClickHouseBackend`]: renders the plan to SQL and runs it on ClickHouse

pub mod clickhouse_client;
pub mod dataset;
pub mod frame;
pub mod memory;

use thiserror::Error;

pub use clickhouse_client::ClickHouseBackend;
pub use frame::{Frame, Value};
pub use memory::MemoryBackend;

use crate::query_planner::QueryPlan;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Table '{table}' not found in database")]
    TableNotFound { table: String },
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { column: String, table: String },
    #[error("Duplicate table '{table}' in dataset")]
    DuplicateTable { table: String },
    #[error("Row {row} of table '{table}' has {actual} values, expected {expected}")]
    RowWidth {
        table: String,
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Unsupported value in table '{table}' column '{column}': {value}")]
    UnsupportedValue {
        table: String,
        column: String,
        value: String,
    },
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse dataset: {0}")]
    Parse(String),
    #[error("ClickHouse error: {0}")]
    ClickHouse(#[from] clickhouse::error::Error),
    #[error("Failed to start query runtime: {0}")]
    Runtime(String),
}

/// A read-only annotation database.
///
/// Implementations are synchronous; async clients block internally.
pub trait Backend {
    /// Names of every table the database holds
    fn list_tables(&self) -> Result<Vec<String>, BackendError>;

    /// Column names of one table, in storage order
    fn table_columns(&self, table: &str) -> Result<Vec<String>, BackendError>;

    /// Every row of one table
    fn scan(&self, table: &str) -> Result<Frame, BackendError>;

    /// Run a plan: join, filter, project, deduplicate and order
    fn execute(&self, plan: &QueryPlan) -> Result<Frame, BackendError>;
}

impl<T: Backend + ?Sized> Backend for Box<T> {
    fn list_tables(&self) -> Result<Vec<String>, BackendError> {
        (**self).list_tables()
    }

    fn table_columns(&self, table: &str) -> Result<Vec<String>, BackendError> {
        (**self).table_columns(table)
    }

    fn scan(&self, table: &str) -> Result<Frame, BackendError> {
        (**self).scan(table)
    }

    fn execute(&self, plan: &QueryPlan) -> Result<Frame, BackendError> {
        (**self).execute(plan)
    }
}
