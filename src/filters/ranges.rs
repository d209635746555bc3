//! Genomic interval filters.
//!
//! A range is written `seq_name:start-end` (e.g. `1:1000-2000`). Two overlap
//! modes are supported, both inclusive at the interval ends:
//!
//! - `any`: the feature starts or ends inside the range
//! - `within`: the feature lies entirely inside the range

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::errors::FilterError;
use crate::query_planner::logical_expr::{Operator, Predicate};
use crate::schema_catalog::{EntitySchema, Feature};

lazy_static! {
    static ref RANGE_PATTERN: Regex = Regex::new(r"^(\w+):(\d+)-(\d+)$").unwrap();
}

const DEFAULT_SEQ_NAME_COLUMN: &str = "seq_name";

/// A parsed `seq_name:start-end` interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomicRange {
    pub seq_name: String,
    pub start: i64,
    pub end: i64,
}

impl FromStr for GenomicRange {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error = || FilterError::InvalidRangeFormat {
            value: s.to_string(),
        };
        let caps = RANGE_PATTERN.captures(s).ok_or_else(format_error)?;
        // Digits that overflow i64 are reported as a format problem
        let start = caps[2].parse::<i64>().map_err(|_| format_error())?;
        let end = caps[3].parse::<i64>().map_err(|_| format_error())?;
        Ok(GenomicRange {
            seq_name: caps[1].to_string(),
            start,
            end,
        })
    }
}

impl fmt::Display for GenomicRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.seq_name, self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapMode {
    #[default]
    Any,
    Within,
}

impl FromStr for OverlapMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(OverlapMode::Any),
            "within" => Ok(OverlapMode::Within),
            other => Err(FilterError::InvalidOverlapMode {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OverlapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapMode::Any => write!(f, "any"),
            OverlapMode::Within => write!(f, "within"),
        }
    }
}

/// Overlap of a feature's interval with a queried range.
///
/// The interval columns start out as the Ensembl ones for `feature` and are
/// rebound to a schema's entity columns by [`RangesFilter::bind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangesFilter {
    pub range: GenomicRange,
    pub mode: OverlapMode,
    pub feature: Feature,
    pub start_column: String,
    pub end_column: String,
    pub seq_name_column: String,
}

impl RangesFilter {
    /// Parse `range` and `mode` against the given feature's coordinates
    pub fn new(range: &str, mode: &str, feature: Feature) -> Result<Self, FilterError> {
        let (start, end) = feature.coordinate_columns();
        Ok(RangesFilter {
            range: range.parse()?,
            mode: mode.parse()?,
            feature,
            start_column: start.to_string(),
            end_column: end.to_string(),
            seq_name_column: DEFAULT_SEQ_NAME_COLUMN.to_string(),
        })
    }

    /// Same range, read through the interval columns of `entity`
    pub fn bind(&self, entity: &EntitySchema) -> Self {
        RangesFilter {
            start_column: entity.start_column.clone(),
            end_column: entity.end_column.clone(),
            seq_name_column: entity.seq_name_column.clone(),
            ..self.clone()
        }
    }

    pub fn columns(&self) -> BTreeSet<String> {
        BTreeSet::from([
            self.start_column.clone(),
            self.end_column.clone(),
            self.seq_name_column.clone(),
        ])
    }

    pub fn convert(&self) -> Predicate {
        let GenomicRange { seq_name, start, end } = &self.range;
        let start_column = self.start_column.as_str();
        let end_column = self.end_column.as_str();
        let on_sequence = Predicate::eq(self.seq_name_column.as_str(), seq_name.as_str());

        let overlap = match self.mode {
            OverlapMode::Any => Predicate::between(end_column, *start, *end)
                .or(Predicate::between(start_column, *start, *end)),
            OverlapMode::Within => {
                Predicate::compare(start_column, Operator::GreaterThanEqual, *start)
                    .and(Predicate::compare(end_column, Operator::LessThanEqual, *end))
            }
        };

        on_sequence.and(overlap)
    }
}
