//! Unit tests - pure planning logic, no dataset or database needed
//!
//! These tests exercise the filter algebra and the schema graph through the
//! public API only.

mod filter_algebra_tests;
mod schema_config_tests;
mod table_resolver_tests;
