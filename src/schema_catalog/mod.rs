pub mod config;
pub mod ensembl;
pub mod errors;
pub mod schema_graph;
pub mod schema_validator;
pub mod table_resolver;
pub mod ucsc;

// Re-export commonly used types
pub use config::SchemaGraphConfig;
pub use errors::SchemaError;
pub use schema_graph::{
    BridgeRule, EntitySchema, Feature, JoinEdge, Partner, SchemaGraph, TableSchema,
};
pub use schema_validator::SchemaValidator;
pub use table_resolver::TableResolver;
