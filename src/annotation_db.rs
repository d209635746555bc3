//! Entity queries over one annotation database.
//!
//! [`AnnotationDb`] pairs a [`Backend`] with the [`SchemaGraph`] describing
//! its tables. Each entity call plans the query up front, so every
//! validation error is reported before the backend runs anything.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use crate::backend::{Backend, ClickHouseBackend, Frame, MemoryBackend};
use crate::config::{AnnotationConfig, BackendKind, ConfigError};
use validator::Validate;
use crate::errors::AnnotationError;
use crate::filters::Filter;
use crate::query_planner::{JoinType, QueryPlan, QueryPlanBuilder};
use crate::schema_catalog::{Feature, SchemaGraph, SchemaGraphConfig, SchemaValidator, TableResolver};
use crate::sql_generator::generate_sql;

const METADATA_TABLE: &str = "metadata";
const CHROMOSOME_TABLES: &[&str] = &["chromosome", "chrominfo"];

/// `(label, metadata key)` pairs shown by `Display`, per schema layout
const ENSEMBL_SUMMARY: &[(&str, &str)] = &[
    ("organism", "Organism"),
    ("ensembl_version", "ensembl_version"),
    ("genome_build", "genome_build"),
];
const UCSC_SUMMARY: &[(&str, &str)] = &[
    ("organism", "Organism"),
    ("ucsc_track", "UCSC Track"),
    ("genome", "Genome"),
    ("ucsc_table", "UCSC Table"),
];

/// Columns, filter and join type of one entity request.
///
/// ```
/// use genomic_features::{EntityQuery, filters::Filter};
///
/// let query = EntityQuery::new()
///     .columns(["gene_id", "gene_name"])
///     .filter(Filter::gene_biotype("protein_coding"))
///     .join_type_str("left")
///     .unwrap();
/// assert_eq!(query.selected_columns().map(|c| c.len()), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityQuery {
    columns: Option<Vec<String>>,
    filter: Filter,
    join_type: JoinType,
}

impl EntityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        self
    }

    /// Set the join type from `"inner"` or `"left"`
    pub fn join_type_str(self, join_type: &str) -> Result<Self, AnnotationError> {
        let join_type: JoinType = join_type.parse()?;
        Ok(self.join_type(join_type))
    }

    pub fn selected_columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn get_filter(&self) -> &Filter {
        &self.filter
    }

    pub fn get_join_type(&self) -> JoinType {
        self.join_type
    }
}

pub struct AnnotationDb<B: Backend> {
    backend: B,
    schema: SchemaGraph,
    metadata: OnceLock<BTreeMap<String, String>>,
}

impl<B: Backend> AnnotationDb<B> {
    /// Wrap a backend holding an Ensembl annotation database
    pub fn new(backend: B) -> Self {
        Self::with_schema(backend, SchemaGraph::ensembl().clone())
    }

    pub fn with_schema(backend: B, schema: SchemaGraph) -> Self {
        AnnotationDb {
            backend,
            schema,
            metadata: OnceLock::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn schema(&self) -> &SchemaGraph {
        &self.schema
    }

    /// Check that the backend carries every table and column of the schema
    pub fn validate_schema(&self) -> Result<(), AnnotationError> {
        SchemaValidator::new(&self.backend).validate(&self.schema)?;
        Ok(())
    }

    pub fn genes(&self, query: &EntityQuery) -> Result<Frame, AnnotationError> {
        self.query(Feature::Gene, query)
    }

    pub fn transcripts(&self, query: &EntityQuery) -> Result<Frame, AnnotationError> {
        self.query(Feature::Transcript, query)
    }

    pub fn exons(&self, query: &EntityQuery) -> Result<Frame, AnnotationError> {
        self.query(Feature::Exon, query)
    }

    pub fn plan(&self, feature: Feature, query: &EntityQuery) -> Result<QueryPlan, AnnotationError> {
        let plan = QueryPlanBuilder::new(&self.schema).plan_entity(
            feature,
            query.selected_columns(),
            query.get_filter(),
            query.get_join_type(),
        )?;
        Ok(plan)
    }

    pub fn query(&self, feature: Feature, query: &EntityQuery) -> Result<Frame, AnnotationError> {
        let plan = self.plan(feature, query)?;
        log::debug!(
            "Querying {} via {:?} ({} join)",
            feature,
            plan.chain(),
            plan.join_type
        );
        let frame = self.backend.execute(&plan)?;
        log::debug!("{} query returned {} rows", feature, frame.num_rows());
        Ok(frame)
    }

    /// SQL the ClickHouse backend would run for this request
    pub fn explain(&self, feature: Feature, query: &EntityQuery) -> Result<String, AnnotationError> {
        Ok(generate_sql(&self.plan(feature, query)?))
    }

    pub fn list_tables(&self) -> Result<Vec<String>, AnnotationError> {
        Ok(self.backend.list_tables()?)
    }

    /// Columns of the given schema tables, or of every table
    pub fn list_columns(&self, tables: Option<&[&str]>) -> Result<Vec<String>, AnnotationError> {
        Ok(TableResolver::new(&self.schema).list_columns(tables)?)
    }

    /// Sequence table of the database (`chromosome` or `chrominfo`)
    pub fn chromosomes(&self) -> Result<Frame, AnnotationError> {
        let table = CHROMOSOME_TABLES
            .iter()
            .find(|t| self.schema.has_table(t))
            .copied()
            .unwrap_or(CHROMOSOME_TABLES[0]);
        Ok(self.backend.scan(table)?)
    }

    /// Key/value pairs of the metadata table, read once per database
    pub fn metadata(&self) -> Result<&BTreeMap<String, String>, AnnotationError> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata);
        }

        let frame = self.backend.scan(METADATA_TABLE)?;
        let mut metadata = BTreeMap::new();
        for row in 0..frame.num_rows() {
            if let (Some(name), Some(value)) = (frame.get(row, "name"), frame.get(row, "value")) {
                if !name.is_null() {
                    metadata.insert(name.to_string(), value.to_string());
                }
            }
        }
        log::debug!("Loaded {} metadata entries", metadata.len());
        Ok(self.metadata.get_or_init(|| metadata))
    }
}

impl AnnotationDb<Box<dyn Backend>> {
    /// Open the database described by `config`.
    ///
    /// Loads the schema override if one is configured and, when asked,
    /// validates it against the backend.
    pub fn open(config: &AnnotationConfig) -> Result<Self, AnnotationError> {
        config.validate().map_err(ConfigError::from)?;

        let backend: Box<dyn Backend> = match (config.backend, &config.data_path) {
            (BackendKind::Memory, Some(path)) => {
                log::info!("Loading annotation dataset from {}", path.display());
                Box::new(MemoryBackend::from_dataset_file(path)?)
            }
            (BackendKind::Memory, None) => Box::new(MemoryBackend::new()),
            (BackendKind::ClickHouse, _) => Box::new(ClickHouseBackend::from_config(config)?),
        };

        let schema = match &config.schema_path {
            Some(path) => {
                log::info!("Loading schema graph from {}", path.display());
                SchemaGraphConfig::from_yaml_file(path)?.to_schema_graph()?
            }
            None => config.layout.schema_graph().clone(),
        };

        let db = AnnotationDb::with_schema(backend, schema);
        if config.validate_schema {
            db.validate_schema()?;
        }
        Ok(db)
    }
}

impl<B: Backend> fmt::Display for AnnotationDb<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metadata = match self.metadata() {
            Ok(metadata) => metadata,
            Err(_) => return write!(f, "AnnotationDb(schema='{}')", self.schema.name()),
        };
        let summary = if self.schema.name() == "ucsc" {
            UCSC_SUMMARY
        } else {
            ENSEMBL_SUMMARY
        };

        write!(f, "AnnotationDb(")?;
        for (i, (label, key)) in summary.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let value = metadata.get(*key).map(String::as_str).unwrap_or("unknown");
            write!(f, "{}='{}'", label, value)?;
        }
        write!(f, ")")
    }
}
