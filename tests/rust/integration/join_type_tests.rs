//! Integration tests for inner versus left joins on optional cross-references

#[cfg(test)]
mod join_type_tests {
    use crate::fixtures::{distinct, fixture_db, gene, set};
    use genomic_features::backend::Value;
    use genomic_features::query_planner::JoinType;
    use genomic_features::EntityQuery;
    use test_case::test_case;

    #[test_case(JoinType::Inner, 3 ; "inner drops genes without entrez ids")]
    #[test_case(JoinType::Left, 6 ; "left keeps every gene")]
    fn test_entrez_cross_reference(join_type: JoinType, rows: usize) {
        let query = EntityQuery::new()
            .columns(["gene_id", "entrezid"])
            .join_type(join_type);
        let frame = fixture_db().genes(&query).unwrap();
        assert_eq!(frame.num_rows(), rows);
    }

    #[test]
    fn test_left_join_fills_nulls() {
        let query = EntityQuery::new()
            .columns(["gene_id", "entrezid"])
            .join_type_str("left")
            .unwrap();
        let frame = fixture_db().genes(&query).unwrap();

        let mut unmatched = Vec::new();
        for row in 0..frame.num_rows() {
            if frame.get(row, "entrezid") == Some(&Value::Null) {
                if let Some(id) = frame.get(row, "gene_id") {
                    unmatched.push(id.to_string());
                }
            }
        }
        assert_eq!(set(&unmatched), set(&[gene(3), gene(4), gene(6)]));
        assert_eq!(frame.get(0, "entrezid"), Some(&Value::from(1001)));
    }

    #[test]
    fn test_left_join_preserves_transcripts() {
        let db = fixture_db();
        let all = db.transcripts(&EntityQuery::new().columns(["tx_id"])).unwrap();
        let query = EntityQuery::new()
            .columns(["tx_id", "protein_id"])
            .join_type(JoinType::Left);
        let with_protein = db.transcripts(&query).unwrap();
        assert_eq!(with_protein.num_rows(), all.num_rows());
        assert_eq!(distinct(&with_protein, "tx_id"), distinct(&all, "tx_id"));
    }

    #[test]
    fn test_left_join_keeps_one_row_per_match() {
        let query = EntityQuery::new()
            .columns(["tx_id", "protein_domain_id"])
            .join_type(JoinType::Left);
        let frame = fixture_db().transcripts(&query).unwrap();
        // one transcript carries two domains
        assert_eq!(frame.num_rows(), 9);
    }

    #[test_case("outer" ; "outer")]
    #[test_case("INNER" ; "upper case")]
    #[test_case("" ; "empty")]
    fn test_invalid_join_type(value: &str) {
        let err = EntityQuery::new().join_type_str(value).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains(&format!("`{}`", value)));
    }
}
