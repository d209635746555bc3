use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use genomic_features::backend::{Backend, Frame};
use genomic_features::config::{self, BackendKind, SchemaLayout};
use genomic_features::filters::{Filter, FilterValue};
use genomic_features::schema_catalog::Feature;
use genomic_features::{AnnotationDb, EntityQuery};

/// genomic-features - query genes, transcripts and exons of an annotation database
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dataset dump (JSON or YAML) for the memory backend
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Storage backend: memory or clickhouse
    #[arg(long, global = true)]
    backend: Option<BackendKind>,

    /// Built-in table layout: ensembl or ucsc
    #[arg(long, global = true)]
    layout: Option<SchemaLayout>,

    /// Schema graph file overriding the built-in layout
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Check the schema against the database before querying
    #[arg(long, global = true)]
    validate_schema: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Query genes
    Genes(EntityArgs),
    /// Query transcripts
    Transcripts(EntityArgs),
    /// Query exons
    Exons(EntityArgs),
    /// List tables of the database
    Tables,
    /// List schema columns, optionally of the given tables
    Columns {
        tables: Vec<String>,
    },
    /// Print the chromosome table
    Chromosomes,
    /// Print database metadata
    Metadata,
}

#[derive(Args)]
struct EntityArgs {
    /// Comma-separated output columns (default: every column of the entity table)
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    #[arg(long, value_delimiter = ',')]
    gene_id: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    gene_name: Vec<String>,

    /// Gene biotype
    #[arg(long, value_delimiter = ',')]
    biotype: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    tx_id: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    exon_id: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    seq_name: Vec<String>,

    /// Genomic range `{seq_name}:{start}-{end}`, matched against the queried entity
    #[arg(long)]
    range: Option<String>,

    /// Range overlap mode: any or within
    #[arg(long, default_value = "any")]
    range_mode: String,

    /// Canonical transcripts only
    #[arg(long)]
    canonical: bool,

    /// Join type: inner or left
    #[arg(long, default_value = "inner")]
    join_type: String,

    /// Print the SQL instead of running the query
    #[arg(long)]
    explain: bool,
}

impl From<&Cli> for config::CliConfig {
    fn from(cli: &Cli) -> Self {
        config::CliConfig {
            backend: cli.backend,
            data_path: cli.data.clone(),
            layout: cli.layout,
            schema_path: cli.schema.clone(),
            validate_schema: cli.validate_schema,
        }
    }
}

fn equality(values: &[String], build: fn(FilterValue) -> Filter) -> Filter {
    match values {
        [] => Filter::Empty,
        [single] => build(FilterValue::from(single.clone())),
        _ => build(FilterValue::from(values.to_vec())),
    }
}

impl EntityArgs {
    fn to_query(&self, feature: Feature) -> anyhow::Result<EntityQuery> {
        let mut filter = equality(&self.gene_id, |v| Filter::gene_id(v))
            & equality(&self.gene_name, |v| Filter::gene_name(v))
            & equality(&self.biotype, |v| Filter::gene_biotype(v))
            & equality(&self.tx_id, |v| Filter::tx_id(v))
            & equality(&self.exon_id, |v| Filter::exon_id(v))
            & equality(&self.seq_name, |v| Filter::seq_name(v));
        if let Some(range) = &self.range {
            filter = filter & Filter::range(range, &self.range_mode, feature)?;
        }
        if self.canonical {
            filter = filter & Filter::canonical();
        }

        let mut query = EntityQuery::new().filter(filter).join_type_str(&self.join_type)?;
        if let Some(columns) = &self.columns {
            query = query.columns(columns.iter().map(|c| c.trim().to_string()));
        }
        Ok(query)
    }
}

fn print_frame(frame: &Frame) -> anyhow::Result<()> {
    for row in frame.to_json_rows() {
        println!("{}", serde_json::to_string(&row)?);
    }
    Ok(())
}

fn run_entity<B: Backend>(db: &AnnotationDb<B>, feature: Feature, args: &EntityArgs) -> anyhow::Result<()> {
    let query = args.to_query(feature)?;
    if args.explain {
        print!("{}", db.explain(feature, &query)?);
        return Ok(());
    }
    let frame = db
        .query(feature, &query)
        .with_context(|| format!("{} query failed", feature))?;
    print_frame(&frame)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::AnnotationConfig::from_cli(config::CliConfig::from(&cli))
        .context("Configuration error")?;
    let db = AnnotationDb::open(&config)?;
    log::info!("Opened {}", db);

    match &cli.command {
        Command::Genes(args) => run_entity(&db, Feature::Gene, args)?,
        Command::Transcripts(args) => run_entity(&db, Feature::Transcript, args)?,
        Command::Exons(args) => run_entity(&db, Feature::Exon, args)?,
        Command::Tables => {
            for table in db.list_tables()? {
                println!("{}", table);
            }
        }
        Command::Columns { tables } => {
            let tables: Vec<&str> = tables.iter().map(String::as_str).collect();
            let subset = if tables.is_empty() {
                None
            } else {
                Some(tables.as_slice())
            };
            for column in db.list_columns(subset)? {
                println!("{}", column);
            }
        }
        Command::Chromosomes => print_frame(&db.chromosomes()?)?,
        Command::Metadata => println!("{}", serde_json::to_string_pretty(db.metadata()?)?),
    }
    Ok(())
}

fn main() {
    // Initialize logger - defaults to WARN level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = dotenvy::dotenv() {
        log::debug!("No .env file loaded: {}", e);
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
