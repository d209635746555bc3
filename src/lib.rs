//! genomic-features - typed filters and a join-planning query builder over
//! genome annotation databases
//!
//! This crate provides:
//! - A composable filter algebra (equality, genomic range overlap, canonical
//!   transcripts, AND/OR/NOT)
//! - Static schema graphs of the Ensembl (EnsDb) and UCSC (TxDb) layouts
//! - Greedy table resolution and join-chain planning
//! - Execution on an in-memory dataset or on ClickHouse
//!
//! ```no_run
//! use genomic_features::{AnnotationDb, EntityQuery};
//! use genomic_features::backend::MemoryBackend;
//! use genomic_features::filters::Filter;
//!
//! let backend = MemoryBackend::from_dataset_file("ensdb.json").unwrap();
//! let db = AnnotationDb::new(backend);
//! let genes = db
//!     .genes(&EntityQuery::new().filter(Filter::gene_range("1:3000-10000", "any").unwrap()))
//!     .unwrap();
//! println!("{} genes", genes.num_rows());
//! ```

pub mod annotation_db;
pub mod backend;
pub mod config;
pub mod errors;
pub mod filters;
pub mod query_planner;
pub mod schema_catalog;
pub mod sql_generator;

pub use annotation_db::{AnnotationDb, EntityQuery};
pub use errors::AnnotationError;
