//! Built-in schema graph for UCSC-derived TxDb databases.
//!
//! TxDb keys transcripts and exons by internal integer ids (`_tx_id`,
//! `_exon_id`) and links them through the `splicing` table. Genes carry no
//! coordinates, so only transcripts and exons are queryable entities.

use lazy_static::lazy_static;

use super::schema_graph::{
    BridgeRule, EntitySchema, Feature, JoinEdge, Partner, SchemaGraph, TableSchema,
};

lazy_static! {
    static ref UCSC_SCHEMA: SchemaGraph = build_ucsc_schema();
}

impl SchemaGraph {
    /// Shared UCSC TxDb schema graph
    pub fn ucsc() -> &'static SchemaGraph {
        &UCSC_SCHEMA
    }
}

fn entity(
    feature: Feature,
    table: &str,
    primary_key: &str,
    prefix: &str,
) -> EntitySchema {
    EntitySchema {
        feature,
        table: table.to_string(),
        primary_key: primary_key.to_string(),
        start_column: format!("{}_start", prefix),
        end_column: format!("{}_end", prefix),
        seq_name_column: format!("{}_chrom", prefix),
    }
}

fn build_ucsc_schema() -> SchemaGraph {
    let tables = vec![
        TableSchema::new(
            "transcript",
            1,
            &[
                "_tx_id",
                "tx_name",
                "tx_type",
                "tx_chrom",
                "tx_strand",
                "tx_start",
                "tx_end",
            ],
        ),
        TableSchema::new(
            "cds",
            2,
            &["_cds_id", "cds_name", "cds_chrom", "cds_strand", "cds_start", "cds_end"],
        ),
        TableSchema::new("gene", 3, &["gene_id", "_tx_id"]),
        TableSchema::new("splicing", 4, &["_tx_id", "exon_rank", "_exon_id", "_cds_id"]),
        TableSchema::new(
            "exon",
            5,
            &[
                "_exon_id",
                "exon_name",
                "exon_chrom",
                "exon_strand",
                "exon_start",
                "exon_end",
            ],
        ),
        TableSchema::new("chrominfo", 6, &["_chrom_id", "chrom", "length", "is_circular"]),
        TableSchema::new("metadata", 99, &["name", "value"]),
    ];

    let join_edges = vec![
        JoinEdge::new("transcript", "gene", "_tx_id"),
        JoinEdge::new("transcript", "splicing", "_tx_id"),
        JoinEdge::new("splicing", "exon", "_exon_id"),
        JoinEdge::new("splicing", "cds", "_cds_id"),
    ];

    // Exons and CDS parts reach everything else through splicing
    let bridge_rules = vec![
        BridgeRule::new(&["exon"], Partner::NoneOf(vec!["exon".to_string()]), "splicing"),
        BridgeRule::new(&["cds"], Partner::NoneOf(vec!["cds".to_string()]), "splicing"),
        BridgeRule::new(
            &["splicing", "exon", "cds"],
            Partner::AnyOf(vec!["gene".to_string()]),
            "transcript",
        ),
    ];

    let entities = vec![
        entity(Feature::Transcript, "transcript", "_tx_id", "tx"),
        entity(Feature::Exon, "exon", "_exon_id", "exon"),
    ];

    SchemaGraph::from_parts("ucsc".to_string(), tables, join_edges, bridge_rules, entities)
}
