//! Unit tests for greedy table resolution and bridge-table closure

#[cfg(test)]
mod table_resolver_tests {
    use genomic_features::schema_catalog::{SchemaError, SchemaGraph, TableResolver};
    use test_case::test_case;

    fn resolver() -> TableResolver<'static> {
        TableResolver::new(SchemaGraph::ensembl())
    }

    /// Columns that all live in one table resolve to exactly that table
    #[test_case(&["gene_id", "gene_name"], "gene" ; "gene")]
    #[test_case(&["seq_name"], "gene" ; "seq_name prefers gene")]
    #[test_case(&["tx_biotype", "tx_is_canonical"], "tx" ; "tx")]
    #[test_case(&["exon_seq_start", "exon_id_version"], "exon" ; "exon")]
    #[test_case(&["seq_length", "is_circular"], "chromosome" ; "chromosome")]
    #[test_case(&["uniprot_db"], "uniprot" ; "uniprot")]
    #[test_case(&["protein_domain_id", "prot_dom_start"], "protein_domain" ; "protein domain")]
    #[test_case(&["entrezid"], "entrezgene" ; "entrezgene")]
    fn test_single_table_columns(columns: &[&str], table: &str) {
        assert_eq!(resolver().tables_for_columns(columns, None).unwrap(), vec![table]);
    }

    #[test_case(&["gene", "protein"], &["gene", "tx", "protein"] ; "gene and protein")]
    #[test_case(&["gene", "exon"], &["gene", "tx", "tx2exon", "exon"] ; "gene and exon")]
    #[test_case(&["tx", "exon"], &["tx", "tx2exon", "exon"] ; "tx and exon")]
    #[test_case(&["tx", "uniprot"], &["tx", "protein", "uniprot"] ; "tx and uniprot")]
    #[test_case(&["protein", "uniprot"], &["protein", "uniprot"] ; "protein core only")]
    #[test_case(&["chromosome", "tx"], &["gene", "tx", "chromosome"] ; "chromosome and tx")]
    #[test_case(&["entrezgene", "exon"], &["gene", "tx", "tx2exon", "exon", "entrezgene"] ; "entrezgene and exon")]
    #[test_case(&["exon"], &["exon"] ; "single table")]
    fn test_required_tables(tables: &[&str], expected: &[&str]) {
        assert_eq!(resolver().get_required_tables(tables), expected);
    }

    #[test]
    fn test_required_tables_are_closed() {
        let resolver = resolver();
        let once = resolver.get_required_tables(&["chromosome", "protein_domain"]);
        assert_eq!(resolver.get_required_tables(once.as_slice()), once);
    }

    #[test]
    fn test_list_columns_keeps_schema_order() {
        let columns = resolver().list_columns(Some(&["tx2exon", "entrezgene"][..])).unwrap();
        assert_eq!(columns, vec!["tx_id", "exon_id", "exon_idx", "gene_id", "entrezid"]);
    }

    #[test]
    fn test_list_columns_unknown_table() {
        assert_eq!(
            resolver().list_columns(Some(&["transcripts"][..])).unwrap_err(),
            SchemaError::InvalidTable {
                table: "transcripts".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_column_is_named() {
        let err = resolver()
            .tables_for_columns(&["gene_id", "gene_symbol"], None)
            .unwrap_err();
        assert!(err.to_string().contains("gene_symbol"));
    }
}
