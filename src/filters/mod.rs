//! Composable row filters for entity queries.
//!
//! Every filter reports the columns it reads ([`Filter::columns`]) so the
//! planner can add them to the query before execution, and compiles to a
//! backend-neutral [`Predicate`] ([`Filter::convert`]).
//!
//! Filters compose with `&`, `|` and `!`:
//!
//! ```
//! use genomic_features::filters::Filter;
//!
//! let f = Filter::gene_biotype("protein_coding") & !Filter::seq_name("MT");
//! assert!(f.columns().contains("gene_biotype"));
//! ```

pub mod errors;
pub mod ranges;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::{BitAnd, BitOr, Not};

pub use errors::FilterError;
pub use ranges::{GenomicRange, OverlapMode, RangesFilter};

use crate::query_planner::logical_expr::{Literal, Predicate};
use crate::schema_catalog::{Feature, SchemaError, SchemaGraph};

/// Columns that support equality filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EqualityColumn {
    GeneId,
    GeneBiotype,
    GeneName,
    TxId,
    TxBiotype,
    ExonId,
    SeqName,
    ProteinId,
    UniprotId,
    UniprotDb,
    UniprotMappingType,
    EntrezId,
}

impl EqualityColumn {
    pub fn column(&self) -> &'static str {
        match self {
            EqualityColumn::GeneId => "gene_id",
            EqualityColumn::GeneBiotype => "gene_biotype",
            EqualityColumn::GeneName => "gene_name",
            EqualityColumn::TxId => "tx_id",
            EqualityColumn::TxBiotype => "tx_biotype",
            EqualityColumn::ExonId => "exon_id",
            EqualityColumn::SeqName => "seq_name",
            EqualityColumn::ProteinId => "protein_id",
            EqualityColumn::UniprotId => "uniprot_id",
            EqualityColumn::UniprotDb => "uniprot_db",
            EqualityColumn::UniprotMappingType => "uniprot_mapping_type",
            EqualityColumn::EntrezId => "entrezid",
        }
    }
}

/// A scalar or a set of accepted values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(Literal),
    List(Vec<Literal>),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Single(value.into())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Single(value.into())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Single(value.into())
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        FilterValue::List(values.into_iter().map(Literal::from).collect())
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::List(values.into_iter().map(Literal::from).collect())
    }
}

impl From<&[&str]> for FilterValue {
    fn from(values: &[&str]) -> Self {
        FilterValue::List(values.iter().copied().map(Literal::from).collect())
    }
}

impl From<Vec<i64>> for FilterValue {
    fn from(values: Vec<i64>) -> Self {
        FilterValue::List(values.into_iter().map(Literal::from).collect())
    }
}

/// `column == value` or `column IN values`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualityFilter {
    pub column: EqualityColumn,
    pub value: FilterValue,
}

impl EqualityFilter {
    pub fn convert(&self) -> Predicate {
        let column = self.column.column();
        match &self.value {
            FilterValue::Single(v) => Predicate::eq(column, v.clone()),
            FilterValue::List(values) => Predicate::in_list(column, values.clone()),
        }
    }
}

/// Immutable filter expression tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    /// Matches every row
    #[default]
    Empty,
    Equality(EqualityFilter),
    Ranges(RangesFilter),
    /// Canonical transcripts only (`tx_is_canonical == 1`)
    Canonical,
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn equality(column: EqualityColumn, value: impl Into<FilterValue>) -> Self {
        Filter::Equality(EqualityFilter {
            column,
            value: value.into(),
        })
    }

    pub fn gene_id(value: impl Into<FilterValue>) -> Self {
        Self::equality(EqualityColumn::GeneId, value)
    }

    pub fn gene_biotype(value: impl Into<FilterValue>) -> Self {
        Self::equality(EqualityColumn::GeneBiotype, value)
    }

    pub fn gene_name(value: impl Into<FilterValue>) -> Self {
        Self::equality(EqualityColumn::GeneName, value)
    }

    pub fn tx_id(value: impl Into<FilterValue>) -> Self {
        Self::equality(EqualityColumn::TxId, value)
    }

    pub fn tx_biotype(value: impl Into<FilterValue>) -> Self {
        Self::equality(EqualityColumn::TxBiotype, value)
    }

    pub fn exon_id(value: impl Into<FilterValue>) -> Self {
        Self::equality(EqualityColumn::ExonId, value)
    }

    pub fn seq_name(value: impl Into<FilterValue>) -> Self {
        Self::equality(EqualityColumn::SeqName, value)
    }

    pub fn protein_id(value: impl Into<FilterValue>) -> Self {
        Self::equality(EqualityColumn::ProteinId, value)
    }

    pub fn uniprot_id(value: impl Into<FilterValue>) -> Self {
        Self::equality(EqualityColumn::UniprotId, value)
    }

    pub fn uniprot_db(value: impl Into<FilterValue>) -> Self {
        Self::equality(EqualityColumn::UniprotDb, value)
    }

    pub fn uniprot_mapping_type(value: impl Into<FilterValue>) -> Self {
        Self::equality(EqualityColumn::UniprotMappingType, value)
    }

    pub fn entrez_id(value: impl Into<FilterValue>) -> Self {
        Self::equality(EqualityColumn::EntrezId, value)
    }

    /// Overlap with a gene's interval; `mode` is `any` or `within`
    pub fn gene_range(range: &str, mode: &str) -> Result<Self, FilterError> {
        Self::range(range, mode, Feature::Gene)
    }

    pub fn range(range: &str, mode: &str, feature: Feature) -> Result<Self, FilterError> {
        Ok(Filter::Ranges(RangesFilter::new(range, mode, feature)?))
    }

    pub fn canonical() -> Self {
        Filter::Canonical
    }

    pub fn and(self, other: Filter) -> Self {
        Filter::And(Box::new(self), Box::new(other))
    }

    /// Either side matches.
    ///
    /// [`Filter::Empty`] is always true, so `Filter::Empty | x` matches every
    /// row whatever `x` is.
    pub fn or(self, other: Filter) -> Self {
        Filter::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Self {
        Filter::Not(Box::new(self))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Filter::Empty)
    }

    /// Rebind every range filter to the interval columns of its entity in
    /// `schema`
    pub fn bind(&self, schema: &SchemaGraph) -> Result<Filter, SchemaError> {
        Ok(match self {
            Filter::Ranges(ranges) => Filter::Ranges(ranges.bind(schema.entity(ranges.feature)?)),
            Filter::And(l, r) => l.bind(schema)?.and(r.bind(schema)?),
            Filter::Or(l, r) => l.bind(schema)?.or(r.bind(schema)?),
            Filter::Not(inner) => inner.bind(schema)?.negate(),
            other => other.clone(),
        })
    }

    /// Columns this filter reads
    pub fn columns(&self) -> BTreeSet<String> {
        match self {
            Filter::Empty => BTreeSet::new(),
            Filter::Equality(eq) => BTreeSet::from([eq.column.column().to_string()]),
            Filter::Ranges(ranges) => ranges.columns(),
            Filter::Canonical => BTreeSet::from(["tx_is_canonical".to_string()]),
            Filter::And(l, r) | Filter::Or(l, r) => {
                let mut columns = l.columns();
                columns.extend(r.columns());
                columns
            }
            Filter::Not(inner) => inner.columns(),
        }
    }

    /// Compile to a row predicate; `Empty` yields the always-true sentinel
    pub fn convert(&self) -> Predicate {
        match self {
            Filter::Empty => Predicate::True,
            Filter::Equality(eq) => eq.convert(),
            Filter::Ranges(ranges) => ranges.convert(),
            Filter::Canonical => Predicate::eq("tx_is_canonical", 1),
            Filter::And(l, r) => l.convert().and(r.convert()),
            Filter::Or(l, r) => l.convert().or(r.convert()),
            Filter::Not(inner) => inner.convert().negate(),
        }
    }
}

impl BitAnd for Filter {
    type Output = Filter;

    fn bitand(self, rhs: Filter) -> Filter {
        self.and(rhs)
    }
}

impl BitOr for Filter {
    type Output = Filter;

    fn bitor(self, rhs: Filter) -> Filter {
        self.or(rhs)
    }
}

impl Not for Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        self.negate()
    }
}
