//! Unit tests for filter composition and compilation

#[cfg(test)]
mod filter_algebra_tests {
    use std::collections::BTreeSet;

    use genomic_features::filters::{Filter, FilterError};
    use genomic_features::query_planner::Predicate;
    use genomic_features::schema_catalog::{Feature, SchemaGraph};
    use test_case::test_case;

    fn sample_filters() -> Vec<Filter> {
        vec![
            Filter::Empty,
            Filter::gene_id("ENSG00000000001"),
            Filter::gene_biotype(vec!["protein_coding", "lncRNA"]),
            Filter::gene_name("ALPHA"),
            Filter::tx_id("ENST00000000011"),
            Filter::tx_biotype("retained_intron"),
            Filter::exon_id("ENSE00000000001"),
            Filter::seq_name(vec!["1", "X"]),
            Filter::protein_id("ENSP00000000011"),
            Filter::uniprot_id("Q11111"),
            Filter::uniprot_db("SWISSPROT"),
            Filter::uniprot_mapping_type("DIRECT"),
            Filter::entrez_id(1001_i64),
            Filter::canonical(),
            Filter::gene_range("1:100-200", "any").unwrap(),
            Filter::range("2:1-50", "within", Feature::Exon).unwrap(),
        ]
    }

    /// Every filter only reads columns the schema knows about
    #[test]
    fn test_filter_columns_are_schema_columns() {
        let schema = SchemaGraph::ensembl();
        for filter in sample_filters() {
            for column in filter.columns() {
                assert!(schema.has_column(&column), "{} is not a schema column", column);
            }
        }
    }

    #[test]
    fn test_and_or_columns_are_union() {
        let filters = sample_filters();
        for a in &filters {
            for b in &filters {
                let expected: BTreeSet<String> = a.columns().union(&b.columns()).cloned().collect();
                assert_eq!((a.clone() & b.clone()).columns(), expected);
                assert_eq!((a.clone() | b.clone()).columns(), expected);
            }
        }
    }

    #[test]
    fn test_not_keeps_columns() {
        for filter in sample_filters() {
            assert_eq!((!filter.clone()).columns(), filter.columns());
        }
    }

    #[test]
    fn test_or_of_scalars_compiles_to_or() {
        let f = Filter::gene_id("A") | Filter::gene_id("B");
        assert_eq!(
            f.convert(),
            Predicate::eq("gene_id", "A").or(Predicate::eq("gene_id", "B"))
        );
    }

    #[test]
    fn test_transcript_range_binds_transcript_columns() {
        let f = Filter::range("1:10-20", "any", Feature::Transcript).unwrap();
        let expected: BTreeSet<String> = ["seq_name", "tx_seq_end", "tx_seq_start"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(f.columns(), expected);
    }

    #[test_case("1:100-200" ; "plain")]
    #[test_case("MT:1-16569" ; "mitochondrial")]
    #[test_case("GL000009_2:5-10" ; "scaffold")]
    fn test_valid_ranges(range: &str) {
        assert!(Filter::gene_range(range, "within").is_ok());
    }

    #[test_case("1:100" ; "missing end")]
    #[test_case("chr1-100-200" ; "no colon")]
    #[test_case("1:-5-10" ; "negative start")]
    #[test_case("1 :100-200" ; "space")]
    fn test_invalid_ranges(range: &str) {
        assert_eq!(
            Filter::gene_range(range, "any").unwrap_err(),
            FilterError::InvalidRangeFormat {
                value: range.to_string()
            }
        );
    }

    #[test]
    fn test_invalid_overlap_mode() {
        let err = Filter::gene_range("1:100-200", "partial").unwrap_err();
        assert!(err.to_string().contains("partial"));
    }
}
