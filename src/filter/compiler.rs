//! Compiles filter specifications into scan filters
//!
//! Compilation validates the tree and builds every regex once. It performs
//! no I/O.

use std::ops::Bound;

use regex::{Regex, RegexBuilder};

use crate::cell::Qualifier;
use crate::errors::{ClientError, ClientResult};
use crate::predicate::{CompareOp, MissingColumn};

use super::scan_filter::ScanFilter;
use super::spec::FilterSpec;

/// Turns a [`FilterSpec`] into a [`ScanFilter`]
pub struct FilterCompiler;

impl FilterCompiler {
    /// Compiles a filter tree.
    ///
    /// Fails with `InvalidFilter` on a bad regex, a regex operator other
    /// than `Equal`/`NotEqual`, an empty `All`/`Any`, or an inverted range.
    pub fn compile(spec: &FilterSpec) -> ClientResult<ScanFilter> {
        match spec {
            FilterSpec::RowKeyMatches { pattern, op } => Ok(ScanFilter::RowKey {
                regex: Self::regex(pattern)?,
                negate: Self::regex_negation(*op)?,
            }),
            FilterSpec::ColumnValueMatches {
                family,
                qualifier,
                pattern,
                op,
                filter_if_missing,
            } => Ok(ScanFilter::ColumnValue {
                family: family.clone(),
                qualifier: qualifier.clone(),
                regex: Self::regex(pattern)?,
                negate: Self::regex_negation(*op)?,
                missing: MissingColumn::from_filter_if_missing(*filter_if_missing),
            }),
            FilterSpec::QualifierPrefix { prefix } => {
                Ok(ScanFilter::QualifierPrefix(prefix.clone()))
            }
            FilterSpec::QualifierRange {
                min,
                min_inclusive,
                max,
                max_inclusive,
            } => {
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        return Err(ClientError::invalid_filter(format!(
                            "qualifier range min '{}' is above max '{}'",
                            lo, hi
                        )));
                    }
                }
                Ok(ScanFilter::QualifierRange {
                    min: Self::bound(min, *min_inclusive),
                    max: Self::bound(max, *max_inclusive),
                })
            }
            FilterSpec::All(children) => {
                Ok(ScanFilter::All(Self::compile_children("all", children)?))
            }
            FilterSpec::Any(children) => {
                Ok(ScanFilter::Any(Self::compile_children("any", children)?))
            }
        }
    }

    fn compile_children(kind: &str, children: &[FilterSpec]) -> ClientResult<Vec<ScanFilter>> {
        if children.is_empty() {
            return Err(ClientError::invalid_filter(format!(
                "'{}' filter needs at least one child",
                kind
            )));
        }
        children.iter().map(Self::compile).collect()
    }

    /// `.` also matches `\n`, so keys and values spanning lines match as one text
    fn regex(pattern: &str) -> ClientResult<Regex> {
        Ok(RegexBuilder::new(pattern)
            .dot_matches_new_line(true)
            .build()?)
    }

    /// Regex comparators only distinguish match from no match
    fn regex_negation(op: CompareOp) -> ClientResult<bool> {
        match op {
            CompareOp::Equal => Ok(false),
            CompareOp::NotEqual => Ok(true),
            other => Err(ClientError::invalid_filter(format!(
                "operator {} is not supported with a regex comparator",
                other
            ))),
        }
    }

    fn bound(q: &Option<Qualifier>, inclusive: bool) -> Bound<Vec<u8>> {
        match q {
            None => Bound::Unbounded,
            Some(q) if inclusive => Bound::Included(q.as_bytes().to_vec()),
            Some(q) => Bound::Excluded(q.as_bytes().to_vec()),
        }
    }
}
