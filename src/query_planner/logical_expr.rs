use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A scalar constant appearing in a predicate.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Integer(i64),
    String(String),
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Integer(value.into())
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<&String> for Literal {
    fn from(value: &String) -> Self {
        Literal::String(value.clone())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::String(s) => write!(f, "'{}'", s),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Operator {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::LessThanEqual => "<=",
            Operator::GreaterThanEqual => ">=",
        }
    }

    /// Whether a comparison outcome satisfies this operator
    pub fn accepts(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Operator::Equal => ordering == Equal,
            Operator::NotEqual => ordering != Equal,
            Operator::LessThan => ordering == Less,
            Operator::GreaterThan => ordering == Greater,
            Operator::LessThanEqual => ordering != Greater,
            Operator::GreaterThanEqual => ordering != Less,
        }
    }
}

/// Backend-neutral boolean expression evaluated row-wise after all joins.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum Predicate {
    /// Always-true sentinel; the predicate of an empty filter
    True,

    /// `column <op> value`
    Comparison {
        column: String,
        operator: Operator,
        value: Literal,
    },

    /// `column IN (values)`
    InList { column: String, values: Vec<Literal> },

    /// `column BETWEEN low AND high`, inclusive on both ends
    Between {
        column: String,
        low: Literal,
        high: Literal,
    },

    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn compare(column: &str, operator: Operator, value: impl Into<Literal>) -> Self {
        Predicate::Comparison {
            column: column.to_string(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(column: &str, value: impl Into<Literal>) -> Self {
        Self::compare(column, Operator::Equal, value)
    }

    pub fn in_list(column: &str, values: Vec<Literal>) -> Self {
        Predicate::InList {
            column: column.to_string(),
            values,
        }
    }

    pub fn between(column: &str, low: impl Into<Literal>, high: impl Into<Literal>) -> Self {
        Predicate::Between {
            column: column.to_string(),
            low: low.into(),
            high: high.into(),
        }
    }

    /// Conjunction; `True` is the identity
    pub fn and(self, other: Predicate) -> Self {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (l, r) => Predicate::And(Box::new(l), Box::new(r)),
        }
    }

    /// Disjunction; `True` absorbs
    pub fn or(self, other: Predicate) -> Self {
        match (self, other) {
            (Predicate::True, _) | (_, Predicate::True) => Predicate::True,
            (l, r) => Predicate::Or(Box::new(l), Box::new(r)),
        }
    }

    pub fn negate(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Predicate::True)
    }

    /// Every column the predicate reads
    pub fn columns(&self) -> BTreeSet<String> {
        let mut columns = BTreeSet::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns(&self, out: &mut BTreeSet<String>) {
        match self {
            Predicate::True => {}
            Predicate::Comparison { column, .. }
            | Predicate::InList { column, .. }
            | Predicate::Between { column, .. } => {
                out.insert(column.clone());
            }
            Predicate::And(l, r) | Predicate::Or(l, r) => {
                l.collect_columns(out);
                r.collect_columns(out);
            }
            Predicate::Not(inner) => inner.collect_columns(out),
        }
    }
}
