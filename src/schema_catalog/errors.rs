//! # Schema Error Types
//!
//! Errors raised while resolving columns and tables against the schema graph,
//! loading schema configuration files, and validating a schema against a backend.
//!
//! ## Error Categories
//!
//! - **Resolution Errors**: unknown columns, empty column requests, unknown tables
//! - **Backend Errors**: schema tables or columns missing from the live database
//! - **Configuration Errors**: file I/O, parsing and structural validation

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("The following columns are not found in any table: {}", .columns.join(", "))]
    InvalidColumns { columns: Vec<String> },
    #[error("No valid columns were found.")]
    NoValidColumns,
    #[error("Invalid table: {table}")]
    InvalidTable { table: String },
    #[error("Unknown entity `{entity}` (not defined in schema)")]
    UnknownEntity { entity: String },
    #[error("Schema table '{table}' does not exist in the database")]
    MissingBackendTable { table: String },
    #[error("Schema column '{column}' not found in database table '{table}'")]
    MissingBackendColumn { column: String, table: String },
    #[error("Could not inspect database while validating schema: {error}")]
    BackendUnavailable { error: String },
    #[error("Failed to read schema configuration: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse schema configuration: {error}")]
    ConfigParseError { error: String },
    #[error("Invalid schema configuration: {message}")]
    InvalidConfig { message: String },
}

impl SchemaError {
    /// Create an InvalidConfig error with context information
    ///
    /// # Example
    /// ```ignore
    /// SchemaError::config_error_with_context(
    ///     "join edge gene-tx",
    ///     "key column `gene_id` missing from table `tx`"
    /// )
    /// ```
    pub fn config_error_with_context(
        element: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        SchemaError::InvalidConfig {
            message: format!("{}\n  Context: {}", element.into(), context.into()),
        }
    }
}
