//! # Batch Executor
//!
//! Heterogeneous Put/Get/Delete lists against one table. Results are
//! positional: entry `i` is the outcome of operation `i`. A failure at one
//! position never aborts or rolls back the others.

mod executor;
mod operation;

pub use executor::BatchExecutor;
pub use operation::{BatchOperation, BatchResponse, BatchResult};
