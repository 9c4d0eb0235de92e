//! Predicate evaluation against a consistent snapshot of a row
//!
//! Evaluation is pure. Comparisons are byte-lexicographic on the newest
//! version only; older versions never participate.

use crate::cell::{Cell, Row};

use super::ast::{CompareOp, Predicate};

/// What a value condition yields when its column is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingColumn {
    /// Absent column fails the condition
    #[default]
    Fail,
    /// Absent column passes the condition
    Pass,
}

impl MissingColumn {
    /// Maps the scan-side `filter_if_missing` flag onto a policy
    pub fn from_filter_if_missing(filter_if_missing: bool) -> Self {
        if filter_if_missing {
            MissingColumn::Fail
        } else {
            MissingColumn::Pass
        }
    }

    /// Verdict for an absent column
    #[inline]
    pub fn verdict(&self) -> bool {
        matches!(self, MissingColumn::Pass)
    }
}

/// Evaluates predicates against row state
pub struct PredicateEvaluator;

impl PredicateEvaluator {
    /// Evaluates one predicate given the newest version of its column.
    ///
    /// `MustNotExist` holds iff `latest` is None. Value predicates on an
    /// absent column fail.
    pub fn evaluate(latest: Option<&Cell>, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::MustNotExist { .. } => latest.is_none(),
            Predicate::MustEqual { value, .. } => match latest {
                Some(cell) => Self::compare(&cell.value, CompareOp::Equal, value),
                None => MissingColumn::Fail.verdict(),
            },
            Predicate::MustCompare { op, value, .. } => match latest {
                Some(cell) => Self::compare(&cell.value, *op, value),
                None => MissingColumn::Fail.verdict(),
            },
        }
    }

    /// Evaluates one predicate against a row, or against no row at all
    pub fn evaluate_row(row: Option<&Row>, predicate: &Predicate) -> bool {
        let latest = row.and_then(|r| r.latest(predicate.family(), predicate.qualifier()));
        Self::evaluate(latest, predicate)
    }

    /// Checks if every predicate holds (AND semantics)
    pub fn evaluate_all(row: Option<&Row>, predicates: &[Predicate]) -> bool {
        predicates
            .iter()
            .all(|pred| Self::evaluate_row(row, pred))
    }

    /// Byte-lexicographic comparison of `actual` against `expected`
    #[inline]
    pub fn compare(actual: &[u8], op: CompareOp, expected: &[u8]) -> bool {
        op.accepts(actual.cmp(expected))
    }
}
