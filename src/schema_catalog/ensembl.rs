//! Built-in schema graph for Ensembl annotation databases (EnsDb layout).

use lazy_static::lazy_static;

use super::schema_graph::{
    BridgeRule, EntitySchema, Feature, JoinEdge, Partner, SchemaGraph, TableSchema,
};

const EXON_FAMILY: &[&str] = &["exon", "tx2exon"];
const CHROMOSOME_FAMILY: &[&str] = &["chromosome"];
const PROTEIN_FAMILY: &[&str] = &["protein", "uniprot", "protein_domain"];

lazy_static! {
    static ref ENSEMBL_SCHEMA: SchemaGraph = build_ensembl_schema();
}

impl SchemaGraph {
    /// Shared Ensembl schema graph
    pub fn ensembl() -> &'static SchemaGraph {
        &ENSEMBL_SCHEMA
    }
}

fn owned(tables: &[&str]) -> Vec<String> {
    tables.iter().map(|t| t.to_string()).collect()
}

fn build_ensembl_schema() -> SchemaGraph {
    let tables = vec![
        TableSchema::new(
            "gene",
            1,
            &[
                "gene_id",
                "gene_name",
                "gene_biotype",
                "gene_seq_start",
                "gene_seq_end",
                "seq_name",
                "seq_strand",
                "seq_coord_system",
                "description",
                "gene_id_version",
                "canonical_transcript",
            ],
        ),
        TableSchema::new(
            "tx",
            2,
            &[
                "tx_id",
                "tx_biotype",
                "tx_seq_start",
                "tx_seq_end",
                "tx_cds_seq_start",
                "tx_cds_seq_end",
                "gene_id",
                "tx_support_level",
                "tx_id_version",
                "gc_content",
                "tx_external_name",
                "tx_is_canonical",
            ],
        ),
        TableSchema::new("tx2exon", 3, &["tx_id", "exon_id", "exon_idx"]),
        TableSchema::new(
            "exon",
            4,
            &["exon_id", "exon_seq_start", "exon_seq_end", "exon_id_version"],
        ),
        TableSchema::new("chromosome", 5, &["seq_name", "seq_length", "is_circular"]),
        TableSchema::new(
            "protein",
            6,
            &["tx_id", "protein_id", "protein_sequence", "protein_id_version"],
        ),
        TableSchema::new(
            "uniprot",
            7,
            &["protein_id", "uniprot_id", "uniprot_db", "uniprot_mapping_type"],
        ),
        TableSchema::new(
            "protein_domain",
            8,
            &[
                "protein_id",
                "protein_domain_id",
                "protein_domain_source",
                "interpro_accession",
                "prot_dom_start",
                "prot_dom_end",
            ],
        ),
        TableSchema::new("entrezgene", 9, &["gene_id", "entrezid"]),
        TableSchema::new("metadata", 99, &["name", "value"]),
    ];

    // Scan order matters: the join chain takes the first matching edge.
    let join_edges = vec![
        JoinEdge::new("gene", "tx", "gene_id"),
        JoinEdge::new("gene", "chromosome", "seq_name"),
        JoinEdge::new("tx", "tx2exon", "tx_id"),
        JoinEdge::new("tx2exon", "exon", "exon_id"),
        JoinEdge::new("tx", "protein", "tx_id"),
        JoinEdge::new("gene", "entrezgene", "gene_id"),
        JoinEdge::new("protein", "protein_domain", "protein_id"),
        JoinEdge::new("protein", "uniprot", "protein_id"),
        JoinEdge::new("uniprot", "protein_domain", "protein_id"),
    ];

    let bridge_rules = vec![
        BridgeRule::new(EXON_FAMILY, Partner::AnyOther, "tx2exon"),
        BridgeRule::new(CHROMOSOME_FAMILY, Partner::AnyOther, "gene"),
        BridgeRule::new(EXON_FAMILY, Partner::AnyOf(owned(&["gene"])), "tx"),
        BridgeRule::new(PROTEIN_FAMILY, Partner::NoneOf(owned(PROTEIN_FAMILY)), "tx"),
        BridgeRule::new(
            &["uniprot", "protein_domain"],
            Partner::NoneOf(owned(PROTEIN_FAMILY)),
            "protein",
        ),
        BridgeRule::new(&["entrezgene"], Partner::AnyOther, "gene"),
    ];

    let entities = vec![
        EntitySchema::new(Feature::Gene, "gene", "gene_id", "seq_name"),
        EntitySchema::new(Feature::Transcript, "tx", "tx_id", "seq_name"),
        EntitySchema::new(Feature::Exon, "exon", "exon_id", "seq_name"),
    ];

    SchemaGraph::from_parts(
        "ensembl".to_string(),
        tables,
        join_edges,
        bridge_rules,
        entities,
    )
}
