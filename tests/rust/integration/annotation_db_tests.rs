//! Integration tests for opening a database from configuration and the
//! auxiliary read-only operations

#[cfg(test)]
mod annotation_db_tests {
    use std::env;
    use std::io::Write;

    use crate::fixtures::{fixture_db, fixture_path};
    use genomic_features::config::{AnnotationConfig, BackendKind, ConfigError};
    use genomic_features::schema_catalog::{Feature, SchemaError};
    use genomic_features::{AnnotationDb, AnnotationError, EntityQuery};
    use serial_test::serial;

    fn memory_config() -> AnnotationConfig {
        AnnotationConfig {
            backend: BackendKind::Memory,
            data_path: Some(fixture_path()),
            ..Default::default()
        }
    }

    #[test]
    fn test_open_and_validate_fixture() {
        let config = AnnotationConfig {
            validate_schema: true,
            ..memory_config()
        };
        let db = AnnotationDb::open(&config).unwrap();
        assert_eq!(db.list_tables().unwrap().len(), 10);
        assert_eq!(db.chromosomes().unwrap().num_rows(), 4);
    }

    #[test]
    fn test_display_uses_metadata() {
        assert_eq!(
            fixture_db().to_string(),
            "AnnotationDb(organism='Homo sapiens', ensembl_version='108', genome_build='GRCh38')"
        );
    }

    #[test]
    fn test_metadata() -> anyhow::Result<()> {
        let db = fixture_db();
        let metadata = db.metadata()?;
        assert_eq!(metadata.get("Db type").map(String::as_str), Some("EnsDb"));
        assert_eq!(metadata.get("taxonomy_id").map(String::as_str), Some("9606"));
        Ok(())
    }

    #[test]
    fn test_list_columns() {
        let db = fixture_db();
        assert_eq!(
            db.list_columns(Some(&["entrezgene"][..])).unwrap(),
            vec!["gene_id", "entrezid"]
        );
        assert!(db.list_columns(None).unwrap().contains(&"uniprot_db".to_string()));
    }

    #[test]
    fn test_explain_renders_join_chain() {
        let query = EntityQuery::new().columns(["exon_id", "gene_name"]);
        let sql = fixture_db().explain(Feature::Exon, &query).unwrap();
        assert!(sql.starts_with("SELECT DISTINCT exon.exon_id AS exon_id"));
        assert!(sql.contains("INNER JOIN tx2exon AS tx2exon ON exon.exon_id = tx2exon.exon_id\n"));
        assert!(sql.contains("INNER JOIN tx AS tx ON tx2exon.tx_id = tx.tx_id\n"));
        assert!(sql.contains("INNER JOIN gene AS gene ON tx.gene_id = gene.gene_id\n"));
    }

    #[test]
    fn test_validation_reports_missing_column() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"tables": [{{"name": "gene", "columns": ["gene_id"], "rows": [["G1"]]}}]}}"#
        )
        .unwrap();
        let config = AnnotationConfig {
            data_path: Some(file.path().to_path_buf()),
            validate_schema: true,
            ..Default::default()
        };
        match AnnotationDb::open(&config) {
            Err(AnnotationError::Schema(SchemaError::MissingBackendColumn { column, table })) => {
                assert_eq!(table, "gene");
                assert_eq!(column, "gene_name");
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("validation should fail"),
        }
    }

    #[test]
    fn test_schema_override() {
        let mut schema = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            schema,
            r#"
name: genes_only
tables:
  - name: gene
    priority: 1
    columns: [gene_id, gene_name, gene_seq_start, gene_seq_end, seq_name]
entities:
  - feature: gene
    table: gene
    primary_key: gene_id
    start_column: gene_seq_start
    end_column: gene_seq_end
    seq_name_column: seq_name
"#
        )
        .unwrap();
        let config = AnnotationConfig {
            schema_path: Some(schema.path().to_path_buf()),
            validate_schema: true,
            ..memory_config()
        };
        let db = AnnotationDb::open(&config).unwrap();
        assert_eq!(db.schema().name(), "genes_only");

        let frame = db.genes(&EntityQuery::new()).unwrap();
        assert_eq!(frame.columns().len(), 5);
        assert_eq!(frame.num_rows(), 6);
        assert!(db.transcripts(&EntityQuery::new()).is_err());
    }

    #[test]
    fn test_open_without_dataset() {
        let result = AnnotationDb::open(&AnnotationConfig::default());
        assert!(matches!(
            result,
            Err(AnnotationError::Config(ConfigError::Validation(_)))
        ));
    }

    #[test]
    #[serial]
    fn test_open_from_environment() {
        env::set_var("GENOMIC_FEATURES_BACKEND", "memory");
        env::set_var("GENOMIC_FEATURES_DATA", fixture_path());
        let config = AnnotationConfig::from_env();
        env::remove_var("GENOMIC_FEATURES_BACKEND");
        env::remove_var("GENOMIC_FEATURES_DATA");

        let db = AnnotationDb::open(&config.unwrap()).unwrap();
        assert_eq!(db.genes(&EntityQuery::new()).unwrap().num_rows(), 6);
    }
}
