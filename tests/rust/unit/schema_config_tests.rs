//! Unit tests for loading alternative schema graphs from files
//!
//! A loaded graph drives the same resolver and planner as the built-in
//! Ensembl graph.

#[cfg(test)]
mod schema_config_tests {
    use std::io::Write;

    use genomic_features::filters::Filter;
    use genomic_features::query_planner::{JoinType, Operator, Predicate, QueryPlanBuilder, QueryPlanError};
    use genomic_features::schema_catalog::{Feature, SchemaError, SchemaGraph, SchemaGraphConfig};

    const RESTRICTED_SCHEMA: &str = r#"
name: restricted
tables:
  - name: gene
    priority: 1
    columns: [gene_id, gene_name, gene_seq_start, gene_seq_end, seq_name]
  - name: tx
    priority: 2
    columns: [tx_id, tx_seq_start, tx_seq_end, gene_id]
  - name: chromosome
    priority: 3
    columns: [seq_name, seq_length]
  - name: xref
    priority: 4
    columns: [tx_id, xref_id]
join_edges:
  - { left: gene, right: tx, key: gene_id }
  - { left: gene, right: chromosome, key: seq_name }
  - { left: tx, right: xref, key: tx_id }
bridge_rules:
  - family: [chromosome]
    partner: { kind: any_other }
    add: gene
  - family: [xref]
    partner: { kind: any_of, tables: [gene, chromosome] }
    add: tx
entities:
  - feature: gene
    table: gene
    primary_key: gene_id
    start_column: gene_seq_start
    end_column: gene_seq_end
    seq_name_column: seq_name
  - feature: transcript
    table: tx
    primary_key: tx_id
    start_column: tx_seq_start
    end_column: tx_seq_end
    seq_name_column: seq_name
"#;

    fn load() -> SchemaGraph {
        load_yaml(RESTRICTED_SCHEMA)
    }

    fn load_yaml(yaml: &str) -> SchemaGraph {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        SchemaGraphConfig::from_yaml_file(file.path())
            .unwrap()
            .to_schema_graph()
            .unwrap()
    }

    #[test]
    fn test_loaded_graph_plans_queries() {
        let schema = load();
        let cols = vec!["gene_id".to_string(), "xref_id".to_string()];
        let plan = QueryPlanBuilder::new(&schema)
            .plan_entity(Feature::Gene, Some(&cols), &Filter::Empty, JoinType::Left)
            .unwrap();
        assert_eq!(plan.chain(), vec!["gene", "tx", "xref"]);
        assert_eq!(plan.joins[1].left_table, "tx");
    }

    #[test]
    fn test_entities_missing_from_graph() {
        let schema = load();
        let err = QueryPlanBuilder::new(&schema)
            .plan_entity(Feature::Exon, None, &Filter::Empty, JoinType::Inner)
            .unwrap_err();
        assert_eq!(
            err,
            QueryPlanError::Schema(SchemaError::UnknownEntity {
                entity: "exon".to_string()
            })
        );
    }

    #[test]
    fn test_round_trip_of_builtin_graph_validates() {
        let config = SchemaGraphConfig::from_schema_graph(SchemaGraph::ensembl());
        let yaml = serde_yaml::to_string(&config).unwrap();
        let reloaded = SchemaGraphConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(&reloaded.to_schema_graph().unwrap(), SchemaGraph::ensembl());
    }

    #[test]
    fn test_malformed_yaml() {
        let result = SchemaGraphConfig::from_yaml_str("name: [unclosed");
        assert!(matches!(result, Err(SchemaError::ConfigParseError { .. })));
    }

    #[test]
    fn test_entity_column_must_exist() {
        let broken = RESTRICTED_SCHEMA.replace("start_column: tx_seq_start", "start_column: tx_start");
        let err = SchemaGraphConfig::from_yaml_str(&broken)
            .unwrap()
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("tx_start"));
    }

    #[test]
    fn test_range_filter_uses_loaded_entity_columns() {
        let yaml = RESTRICTED_SCHEMA
            .replace("tx_seq_start", "tx_start")
            .replace("tx_seq_end", "tx_end");
        let schema = load_yaml(&yaml);
        let filter = Filter::range("1:10-20", "within", Feature::Transcript).unwrap();
        let plan = QueryPlanBuilder::new(&schema)
            .plan_entity(Feature::Transcript, None, &filter, JoinType::Inner)
            .unwrap();

        assert_eq!(plan.chain(), vec!["tx", "gene"]);
        assert_eq!(
            plan.filter,
            Predicate::eq("seq_name", "1").and(
                Predicate::compare("tx_start", Operator::GreaterThanEqual, 10)
                    .and(Predicate::compare("tx_end", Operator::LessThanEqual, 20))
            )
        );
        assert_eq!(plan.order_by[..2], ["seq_name".to_string(), "tx_start".to_string()]);
        assert_eq!(plan.column_sources["tx_start"], "tx");
        assert_eq!(plan.column_sources["seq_name"], "gene");
    }
}
