//! Predicate structures for conditional mutations

use std::cmp::Ordering;
use std::fmt;

use crate::cell::{Qualifier, RowKey};
use crate::errors::{ClientError, ClientResult};

/// Comparison operators over byte values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl CompareOp {
    /// Returns true if `actual.cmp(expected) == ordering` satisfies this operator
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Equal => ordering == Ordering::Equal,
            CompareOp::NotEqual => ordering != Ordering::Equal,
            CompareOp::Less => ordering == Ordering::Less,
            CompareOp::LessOrEqual => ordering != Ordering::Greater,
            CompareOp::Greater => ordering == Ordering::Greater,
            CompareOp::GreaterOrEqual => ordering != Ordering::Less,
        }
    }

    /// Returns the operator name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Equal => "EQUAL",
            CompareOp::NotEqual => "NOT_EQUAL",
            CompareOp::Less => "LESS",
            CompareOp::LessOrEqual => "LESS_OR_EQUAL",
            CompareOp::Greater => "GREATER",
            CompareOp::GreaterOrEqual => "GREATER_OR_EQUAL",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single condition on one column of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// No version of the column exists
    MustNotExist { family: String, qualifier: Qualifier },
    /// The current value equals `value`
    MustEqual {
        family: String,
        qualifier: Qualifier,
        value: Vec<u8>,
    },
    /// The current value satisfies `op` against `value`
    MustCompare {
        family: String,
        qualifier: Qualifier,
        op: CompareOp,
        value: Vec<u8>,
    },
}

impl Predicate {
    /// Create an absence predicate
    pub fn not_exists(family: impl Into<String>, qualifier: impl Into<Qualifier>) -> Self {
        Self::MustNotExist {
            family: family.into(),
            qualifier: qualifier.into(),
        }
    }

    /// Create an equality predicate
    pub fn equals(
        family: impl Into<String>,
        qualifier: impl Into<Qualifier>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        Self::MustEqual {
            family: family.into(),
            qualifier: qualifier.into(),
            value: value.into(),
        }
    }

    /// Create a comparison predicate
    pub fn compare(
        family: impl Into<String>,
        qualifier: impl Into<Qualifier>,
        op: CompareOp,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        Self::MustCompare {
            family: family.into(),
            qualifier: qualifier.into(),
            op,
            value: value.into(),
        }
    }

    /// Returns the targeted family
    pub fn family(&self) -> &str {
        match self {
            Self::MustNotExist { family, .. }
            | Self::MustEqual { family, .. }
            | Self::MustCompare { family, .. } => family,
        }
    }

    /// Returns the targeted qualifier
    pub fn qualifier(&self) -> &Qualifier {
        match self {
            Self::MustNotExist { qualifier, .. }
            | Self::MustEqual { qualifier, .. }
            | Self::MustCompare { qualifier, .. } => qualifier,
        }
    }

    /// Returns the predicate name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MustNotExist { .. } => "not_exists",
            Self::MustEqual { .. } => "equals",
            Self::MustCompare { .. } => "compare",
        }
    }
}

/// Ordered, non-empty list of predicates on one row, combined with AND
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateSet {
    row: RowKey,
    predicates: Vec<Predicate>,
}

impl PredicateSet {
    /// Creates a predicate set. At least one predicate is required.
    pub fn new(row: impl Into<RowKey>, predicates: Vec<Predicate>) -> ClientResult<Self> {
        let row = row.into();
        if predicates.is_empty() {
            return Err(ClientError::invalid_argument(format!(
                "predicate set for row '{}' is empty",
                row
            )));
        }
        Ok(Self { row, predicates })
    }

    /// Creates a predicate set holding one predicate
    pub fn single(row: impl Into<RowKey>, predicate: Predicate) -> Self {
        Self {
            row: row.into(),
            predicates: vec![predicate],
        }
    }

    /// Returns the row every predicate is scoped to
    #[inline]
    pub fn row(&self) -> &RowKey {
        &self.row
    }

    /// Returns the predicates in evaluation order
    #[inline]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Number of predicates
    #[inline]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns true if the set holds no predicates
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}
