//! # Mutations
//!
//! Single-row operation values and the Conditional Mutation Coordinator.
//!
//! - [`Put`] writes columns; timestamps default to the backend's "now"
//! - [`Delete`] removes a row, a family, a column, or one version
//! - [`Get`] reads a row projection
//! - [`MutationBatch`] merges puts and deletes for one row, in order
//! - [`ConditionalMutator`] applies a batch iff a predicate set holds
//!
//! A failed check-and-mutate returns `Ok(false)`. No partial application
//! is ever observable.

mod batch;
mod coordinator;
mod ops;

pub use batch::{Mutation, MutationBatch};
pub use coordinator::ConditionalMutator;
pub use ops::{ColumnSelector, ColumnWrite, Delete, DeleteTarget, Get, Put};
