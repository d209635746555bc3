//! Integration tests - full entity queries against the fixture dataset
//!
//! These tests open `tests/fixtures/mini_ensdb.json` through the memory
//! backend and check query results end to end. No ClickHouse instance needed.

mod annotation_db_tests;
mod entity_query_tests;
mod join_type_tests;

pub mod fixtures {
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    use genomic_features::backend::{Frame, MemoryBackend};
    use genomic_features::AnnotationDb;

    pub fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/mini_ensdb.json")
    }

    pub fn fixture_db() -> AnnotationDb<MemoryBackend> {
        let backend = MemoryBackend::from_dataset_file(fixture_path()).expect("fixture dataset loads");
        AnnotationDb::new(backend)
    }

    /// Distinct non-null values of one column, rendered as text
    pub fn distinct(frame: &Frame, column: &str) -> BTreeSet<String> {
        frame
            .distinct_values(column)
            .unwrap_or_else(|| panic!("column {} missing from result", column))
            .into_iter()
            .filter(|v| !v.is_null())
            .map(|v| v.to_string())
            .collect()
    }

    pub fn gene(n: u32) -> String {
        format!("ENSG{:011}", n)
    }

    pub fn set(values: &[String]) -> BTreeSet<String> {
        values.iter().cloned().collect()
    }
}
