//! Integration tests for gene, transcript and exon queries with filters

#[cfg(test)]
mod entity_query_tests {
    use crate::fixtures::{distinct, fixture_db, gene, set};
    use genomic_features::backend::Value;
    use genomic_features::filters::Filter;
    use genomic_features::schema_catalog::{Feature, SchemaGraph};
    use genomic_features::{AnnotationError, EntityQuery};
    use test_case::test_case;

    fn tx(n: u32) -> String {
        format!("ENST{:011}", n)
    }

    fn exon(n: u32) -> String {
        format!("ENSE{:011}", n)
    }

    fn filtered(filter: Filter) -> EntityQuery {
        EntityQuery::new().filter(filter)
    }

    #[test]
    fn test_default_gene_query() {
        let frame = fixture_db().genes(&EntityQuery::new()).unwrap();
        assert_eq!(frame.num_rows(), 6);
        let gene_columns = &SchemaGraph::ensembl().table("gene").unwrap().columns;
        assert_eq!(frame.columns(), gene_columns.as_slice());
    }

    #[test]
    fn test_empty_filter_keeps_every_row() {
        let db = fixture_db();
        let unfiltered = db.transcripts(&EntityQuery::new()).unwrap();
        let empty = db.transcripts(&filtered(Filter::Empty)).unwrap();
        assert_eq!(unfiltered.num_rows(), 8);
        assert_eq!(empty, unfiltered);
    }

    #[test]
    fn test_gene_and_transcript_columns() {
        let query = EntityQuery::new().columns(["gene_id", "gene_name", "tx_id"]);
        let frame = fixture_db().genes(&query).unwrap();
        assert_eq!(frame.num_rows(), 8);
        assert_eq!(distinct(&frame, "gene_id").len(), 6);
    }

    #[test]
    fn test_scalar_equality() {
        let frame = fixture_db()
            .genes(&filtered(Filter::gene_biotype("lncRNA")))
            .unwrap();
        assert_eq!(distinct(&frame, "gene_biotype"), set(&["lncRNA".to_string()]));
        assert_eq!(distinct(&frame, "gene_id"), set(&[gene(3)]));
    }

    #[test]
    fn test_list_equality() {
        let ids = vec![gene(1), gene(2), gene(5)];
        let frame = fixture_db()
            .genes(&filtered(Filter::gene_id(ids.clone())))
            .unwrap();
        assert_eq!(distinct(&frame, "gene_id"), set(&ids));
    }

    #[test]
    fn test_exclusive_equalities_match_nothing() {
        let filter = Filter::gene_id(gene(1)) & Filter::gene_id(gene(2));
        let frame = fixture_db().genes(&filtered(filter)).unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn test_or_equals_list() {
        let db = fixture_db();
        let or = db
            .genes(&filtered(Filter::gene_name("ALPHA") | Filter::gene_name("DELTA")))
            .unwrap();
        let list = db
            .genes(&filtered(Filter::gene_name(vec!["ALPHA", "DELTA"])))
            .unwrap();
        assert_eq!(or, list);
        assert_eq!(or.num_rows(), 2);
    }

    #[test]
    fn test_negated_biotype() {
        let frame = fixture_db()
            .genes(&filtered(!Filter::gene_biotype("protein_coding")))
            .unwrap();
        assert_eq!(distinct(&frame, "gene_id"), set(&[gene(3), gene(6)]));
    }

    #[test]
    fn test_absent_biotype_is_not_an_error() {
        let frame = fixture_db()
            .genes(&filtered(Filter::gene_biotype("pseudogene")))
            .unwrap();
        assert_eq!(frame.num_rows(), 0);
    }

    #[test_case("any", &[1, 2] ; "any overlap")]
    #[test_case("within", &[2] ; "within")]
    fn test_gene_range(mode: &str, expected: &[u32]) {
        let filter = Filter::gene_range("1:3000-10000", mode).unwrap();
        let frame = fixture_db().genes(&filtered(filter)).unwrap();
        let expected: Vec<String> = expected.iter().map(|&n| gene(n)).collect();
        assert_eq!(distinct(&frame, "gene_id"), set(&expected));
    }

    #[test]
    fn test_within_rows_are_contained() {
        let db = fixture_db();
        let within = db
            .exons(&filtered(Filter::range("1:1000-5000", "within", Feature::Exon).unwrap()))
            .unwrap();
        assert!(!within.is_empty());
        for row in 0..within.num_rows() {
            assert_eq!(within.get(row, "seq_name"), Some(&Value::from("1")));
            assert!(within.get(row, "exon_seq_start").and_then(Value::as_i64) >= Some(1000));
            assert!(within.get(row, "exon_seq_end").and_then(Value::as_i64) <= Some(5000));
        }

        let any = db
            .exons(&filtered(Filter::range("1:1000-5000", "any", Feature::Exon).unwrap()))
            .unwrap();
        assert!(distinct(&within, "exon_id").is_subset(&distinct(&any, "exon_id")));
    }

    /// A feature spanning the whole query range has neither end inside it
    #[test]
    fn test_any_overlap_checks_endpoints() {
        let filter = Filter::range("1:4000-4500", "any", Feature::Transcript).unwrap();
        let frame = fixture_db().transcripts(&filtered(filter)).unwrap();
        assert_eq!(distinct(&frame, "tx_id"), set(&[tx(12), tx(21), tx(22)]));
    }

    #[test]
    fn test_transcripts_are_sorted_by_position() {
        let frame = fixture_db().transcripts(&EntityQuery::new()).unwrap();
        let order: Vec<String> = frame
            .column("tx_id")
            .unwrap()
            .into_iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(
            order,
            vec![tx(11), tx(12), tx(21), tx(22), tx(31), tx(41), tx(61), tx(51)]
        );
    }

    #[test_case(Feature::Gene ; "genes")]
    #[test_case(Feature::Transcript ; "transcripts")]
    #[test_case(Feature::Exon ; "exons")]
    fn test_resorting_is_a_no_op(feature: Feature) {
        let db = fixture_db();
        let query = EntityQuery::new();
        let plan = db.plan(feature, &query).unwrap();
        let frame = db.query(feature, &query).unwrap();
        let mut resorted = frame.clone();
        resorted.sort_by_columns(&plan.order_by);
        assert_eq!(resorted, frame);
    }

    #[test]
    fn test_exons_of_one_gene() {
        let frame = fixture_db().exons(&filtered(Filter::gene_id(gene(1)))).unwrap();
        let order: Vec<String> = frame
            .column("exon_id")
            .unwrap()
            .into_iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(order, vec![exon(1), exon(3), exon(2)]);
    }

    #[test]
    fn test_canonical_transcripts() {
        let db = fixture_db();
        let canonical = db.transcripts(&filtered(Filter::canonical())).unwrap();
        assert_eq!(canonical.num_rows(), 6);
        let other = db.transcripts(&filtered(!Filter::canonical())).unwrap();
        assert_eq!(distinct(&other, "tx_id"), set(&[tx(12), tx(22)]));
    }

    #[test]
    fn test_transcripts_by_uniprot_db() {
        let frame = fixture_db()
            .transcripts(&filtered(Filter::uniprot_db("SWISSPROT")))
            .unwrap();
        assert_eq!(distinct(&frame, "tx_id"), set(&[tx(11), tx(21), tx(41)]));
        assert_eq!(frame.num_rows(), 3);
    }

    #[test]
    fn test_protein_domains_reach_transcripts_through_protein() {
        let query = EntityQuery::new().columns(["tx_id", "protein_domain_id"]);
        let db = fixture_db();
        assert_eq!(
            db.plan(Feature::Transcript, &query).unwrap().chain(),
            vec!["tx", "protein", "protein_domain"]
        );
        assert_eq!(db.transcripts(&query).unwrap().num_rows(), 3);
    }

    #[test]
    fn test_unknown_column_fails_before_execution() {
        let err = fixture_db()
            .genes(&EntityQuery::new().columns(["gene_id", "symbol"]))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("symbol"));
    }

    #[test]
    fn test_disconnected_tables_are_rejected() {
        let err = fixture_db()
            .genes(&EntityQuery::new().columns(["gene_id", "name"]))
            .unwrap_err();
        assert!(matches!(err, AnnotationError::QueryPlan(_)));
        assert!(err.to_string().contains("metadata"));
    }
}
