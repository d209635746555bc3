use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::schema_catalog::SchemaGraph;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown backend `{0}` (expected `memory` or `clickhouse`)")]
pub struct UnknownBackend(pub String);

/// Where annotation tables are read from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Dataset dump loaded into memory
    #[default]
    Memory,
    ClickHouse,
}

impl FromStr for BackendKind {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "clickhouse" => Ok(BackendKind::ClickHouse),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::ClickHouse => write!(f, "clickhouse"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown layout `{0}` (expected `ensembl` or `ucsc`)")]
pub struct UnknownLayout(pub String);

/// Built-in table layout of the annotation database
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaLayout {
    /// EnsDb
    #[default]
    Ensembl,
    /// UCSC TxDb
    Ucsc,
}

impl SchemaLayout {
    pub fn schema_graph(&self) -> &'static SchemaGraph {
        match self {
            SchemaLayout::Ensembl => SchemaGraph::ensembl(),
            SchemaLayout::Ucsc => SchemaGraph::ucsc(),
        }
    }
}

impl FromStr for SchemaLayout {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ensembl" | "ensdb" => Ok(SchemaLayout::Ensembl),
            "ucsc" | "txdb" => Ok(SchemaLayout::Ucsc),
            _ => Err(UnknownLayout(s.to_string())),
        }
    }
}

impl fmt::Display for SchemaLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaLayout::Ensembl => write!(f, "ensembl"),
            SchemaLayout::Ucsc => write!(f, "ucsc"),
        }
    }
}

/// Annotation database configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[validate(schema(function = "validate_data_source"))]
#[serde(default)]
pub struct AnnotationConfig {
    pub backend: BackendKind,

    /// Dataset dump (JSON or YAML) for the memory backend
    pub data_path: Option<PathBuf>,

    /// Built-in schema graph used when no `schema_path` is given
    pub layout: SchemaLayout,

    /// Schema graph override
    pub schema_path: Option<PathBuf>,

    /// Whether to check the schema graph against the database on open
    pub validate_schema: bool,

    #[validate(length(min = 1, message = "ClickHouse URL cannot be empty"))]
    pub clickhouse_url: String,

    pub clickhouse_user: String,

    pub clickhouse_password: String,

    #[validate(length(min = 1, message = "ClickHouse database cannot be empty"))]
    pub clickhouse_database: String,
}

fn validate_data_source(config: &AnnotationConfig) -> Result<(), ValidationError> {
    if config.backend == BackendKind::Memory && config.data_path.is_none() {
        let mut err = ValidationError::new("data_path_required");
        err.message = Some(Cow::Borrowed(
            "The memory backend needs a dataset file (data_path)",
        ));
        return Err(err);
    }
    Ok(())
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            data_path: None,
            layout: SchemaLayout::Ensembl,
            schema_path: None,
            validate_schema: false,
            clickhouse_url: "http://localhost:8123".to_string(),
            clickhouse_user: "default".to_string(),
            clickhouse_password: String::new(),
            clickhouse_database: "default".to_string(),
        }
    }
}

impl AnnotationConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            backend: parse_env_var("GENOMIC_FEATURES_BACKEND", "memory")?,
            data_path: env::var("GENOMIC_FEATURES_DATA").ok().map(PathBuf::from),
            layout: parse_env_var("GENOMIC_FEATURES_LAYOUT", "ensembl")?,
            schema_path: env::var("GENOMIC_FEATURES_SCHEMA").ok().map(PathBuf::from),
            validate_schema: parse_env_var("GENOMIC_FEATURES_VALIDATE_SCHEMA", "false")?,
            clickhouse_url: env::var("CLICKHOUSE_URL")
                .unwrap_or_else(|_| "http://localhost:8123".to_string()),
            clickhouse_user: env::var("CLICKHOUSE_USER").unwrap_or_else(|_| "default".to_string()),
            clickhouse_password: env::var("CLICKHOUSE_PASSWORD").unwrap_or_default(),
            clickhouse_database: env::var("CLICKHOUSE_DATABASE")
                .unwrap_or_else(|_| "default".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation.
    ///
    /// Options left unset on the command line fall back to the environment.
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let env_or = |key: &str, default: &str| env::var(key).unwrap_or_else(|_| default.to_string());

        let backend = match cli.backend {
            Some(backend) => backend,
            None => parse_env_var("GENOMIC_FEATURES_BACKEND", "memory")?,
        };

        let layout = match cli.layout {
            Some(layout) => layout,
            None => parse_env_var("GENOMIC_FEATURES_LAYOUT", "ensembl")?,
        };

        let config = Self {
            backend,
            layout,
            data_path: cli
                .data_path
                .or_else(|| env::var("GENOMIC_FEATURES_DATA").ok().map(PathBuf::from)),
            schema_path: cli
                .schema_path
                .or_else(|| env::var("GENOMIC_FEATURES_SCHEMA").ok().map(PathBuf::from)),
            validate_schema: cli.validate_schema
                || parse_env_var("GENOMIC_FEATURES_VALIDATE_SCHEMA", "false")?,
            clickhouse_url: env_or("CLICKHOUSE_URL", "http://localhost:8123"),
            clickhouse_user: env_or("CLICKHOUSE_USER", "default"),
            clickhouse_password: env_or("CLICKHOUSE_PASSWORD", ""),
            clickhouse_database: env_or("CLICKHOUSE_DATABASE", "default"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub backend: Option<BackendKind>,
    pub data_path: Option<PathBuf>,
    pub layout: Option<SchemaLayout>,
    pub schema_path: Option<PathBuf>,
    pub validate_schema: bool,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
