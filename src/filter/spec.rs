//! Filter specifications as written by callers

use crate::cell::Qualifier;
use crate::predicate::CompareOp;

/// Uncompiled filter tree
///
/// Row-level variants (`RowKeyMatches`, `ColumnValueMatches`) decide whole
/// rows. Cell-level variants (`QualifierPrefix`, `QualifierRange`) decide
/// individual cells. `All` and `Any` combine children with AND and OR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    /// Row key text matched against a regex; `op` is `Equal` or `NotEqual`
    RowKeyMatches { pattern: String, op: CompareOp },
    /// Current value of one column matched against a regex.
    ///
    /// A retained row is returned whole, not just the matched column.
    ColumnValueMatches {
        family: String,
        qualifier: Qualifier,
        pattern: String,
        op: CompareOp,
        filter_if_missing: bool,
    },
    /// Cells whose qualifier starts with `prefix`
    QualifierPrefix { prefix: Vec<u8> },
    /// Cells whose qualifier falls between the bounds; None is unbounded
    QualifierRange {
        min: Option<Qualifier>,
        min_inclusive: bool,
        max: Option<Qualifier>,
        max_inclusive: bool,
    },
    /// Every child must retain the cell
    All(Vec<FilterSpec>),
    /// At least one child must retain the cell
    Any(Vec<FilterSpec>),
}

impl FilterSpec {
    /// Rows whose key matches (or, with `NotEqual`, does not match) `pattern`
    pub fn row_key_regex(pattern: impl Into<String>, op: CompareOp) -> Self {
        Self::RowKeyMatches {
            pattern: pattern.into(),
            op,
        }
    }

    /// Rows whose column value matches `pattern`. Rows lacking the column
    /// are excluded.
    pub fn value_regex(
        family: impl Into<String>,
        qualifier: impl Into<Qualifier>,
        pattern: impl Into<String>,
        op: CompareOp,
    ) -> Self {
        Self::column_value(family, qualifier, pattern, op, true)
    }

    /// Column value match with explicit handling of rows lacking the column
    pub fn column_value(
        family: impl Into<String>,
        qualifier: impl Into<Qualifier>,
        pattern: impl Into<String>,
        op: CompareOp,
        filter_if_missing: bool,
    ) -> Self {
        Self::ColumnValueMatches {
            family: family.into(),
            qualifier: qualifier.into(),
            pattern: pattern.into(),
            op,
            filter_if_missing,
        }
    }

    /// Cells whose qualifier starts with `prefix`
    pub fn qualifier_prefix(prefix: impl Into<Vec<u8>>) -> Self {
        Self::QualifierPrefix {
            prefix: prefix.into(),
        }
    }

    /// Cells whose qualifier lies between `min` and `max`
    pub fn qualifier_range(
        min: Option<Qualifier>,
        min_inclusive: bool,
        max: Option<Qualifier>,
        max_inclusive: bool,
    ) -> Self {
        Self::QualifierRange {
            min,
            min_inclusive,
            max,
            max_inclusive,
        }
    }

    /// Qualifier prefix AND inclusive qualifier range
    pub fn prefix_and_range(
        prefix: impl Into<Vec<u8>>,
        min: impl Into<Qualifier>,
        max: impl Into<Qualifier>,
    ) -> Self {
        Self::All(vec![
            Self::qualifier_prefix(prefix),
            Self::qualifier_range(Some(min.into()), true, Some(max.into()), true),
        ])
    }

    /// Conjunction
    pub fn all(children: Vec<FilterSpec>) -> Self {
        Self::All(children)
    }

    /// Disjunction
    pub fn any(children: Vec<FilterSpec>) -> Self {
        Self::Any(children)
    }

    /// Returns the variant name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RowKeyMatches { .. } => "row_key_matches",
            Self::ColumnValueMatches { .. } => "column_value_matches",
            Self::QualifierPrefix { .. } => "qualifier_prefix",
            Self::QualifierRange { .. } => "qualifier_range",
            Self::All(_) => "all",
            Self::Any(_) => "any",
        }
    }
}
