//! Predicate engine for widecol
//!
//! Typed conditions on a single column of a single row, evaluated against
//! the row's state before any mutation is applied.
//!
//! # Semantics
//!
//! - `MustNotExist` holds iff no version of the column exists
//! - `MustEqual` / `MustCompare` look at the newest version only
//! - Comparison is byte-lexicographic, never numeric or collated
//! - A value condition on an absent column follows [`MissingColumn`];
//!   conditional mutations always use `MissingColumn::Fail`
//! - A [`PredicateSet`] is never empty and combines with AND

mod ast;
mod evaluator;

pub use ast::{CompareOp, Predicate, PredicateSet};
pub use evaluator::{MissingColumn, PredicateEvaluator};
