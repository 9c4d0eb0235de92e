//! # Storage Backend
//!
//! The only boundary the access layer crosses. A backend serves point
//! reads, atomic conditional mutations, bounded scans and batches.
//!
//! Atomicity is the backend's job: `apply_conditional` must evaluate the
//! predicates and apply the batch as one step with respect to every other
//! mutator of the row. Timeouts and retries also live behind this trait;
//! the core surfaces any failure as a single [`ClientError`].
//!
//! Table administration is not part of the trait. [`InMemoryBackend`]
//! offers it as inherent methods.

mod descriptor;
mod memory;

pub use descriptor::{ColumnFamilyDescriptor, TableDescriptor};
pub use memory::InMemoryBackend;

use crate::batch::{BatchOperation, BatchResult};
use crate::cell::{Cell, Qualifier, Row, RowKey};
use crate::errors::ClientResult;
use crate::filter::ScanFilter;
use crate::mutation::MutationBatch;
use crate::predicate::Predicate;
use crate::scan::ScanBound;

/// Capability consumed by the access layer
pub trait StorageBackend: Send + Sync {
    /// Newest version of one column, or None if the column is absent
    fn get_latest(
        &self,
        table: &str,
        row: &RowKey,
        family: &str,
        qualifier: &Qualifier,
    ) -> ClientResult<Option<Cell>>;

    /// Applies `mutations` iff every predicate holds on the current row.
    ///
    /// Returns `Ok(false)` when a predicate fails; nothing is applied then.
    fn apply_conditional(
        &self,
        table: &str,
        row: &RowKey,
        predicates: &[Predicate],
        mutations: &MutationBatch,
    ) -> ClientResult<bool>;

    /// Opens a bounded scan. Rows arrive in ascending key order.
    fn open_scan(&self, table: &str, request: &ScanRequest<'_>) -> ClientResult<RowScanner>;

    /// Executes operations in input order with one result per operation.
    ///
    /// An `Err` from the call itself means nothing was attempted.
    fn apply_batch(
        &self,
        table: &str,
        operations: &[BatchOperation],
    ) -> ClientResult<Vec<BatchResult>>;
}

/// Parameters of one bounded scan
#[derive(Debug, Clone, Default)]
pub struct ScanRequest<'a> {
    /// Compiled filter, if any
    pub filter: Option<&'a ScanFilter>,
    /// Lower bound on row keys
    pub start: ScanBound,
    /// Maximum rows returned
    pub limit: Option<usize>,
    /// Versions per column; None means newest only
    pub max_versions: Option<usize>,
}

impl<'a> ScanRequest<'a> {
    /// Effective limit
    pub fn row_limit(&self) -> usize {
        self.limit.unwrap_or(usize::MAX)
    }

    /// Effective version count, at least one
    pub fn versions(&self) -> usize {
        self.max_versions.unwrap_or(1).max(1)
    }
}

/// Open scan over rows; closed by the caller after exhaustion
pub struct RowScanner {
    rows: Box<dyn Iterator<Item = ClientResult<Row>> + Send>,
    closed: bool,
}

impl RowScanner {
    /// Wraps a row stream
    pub fn new(rows: impl Iterator<Item = ClientResult<Row>> + Send + 'static) -> Self {
        Self {
            rows: Box::new(rows),
            closed: false,
        }
    }

    /// Scanner over materialized rows
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::new(rows.into_iter().map(Ok))
    }

    /// Releases the stream; later calls to `next` return None
    pub fn close(&mut self) {
        self.closed = true;
        self.rows = Box::new(std::iter::empty());
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Iterator for RowScanner {
    type Item = ClientResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.rows.next()
    }
}

impl std::fmt::Debug for RowScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowScanner")
            .field("closed", &self.closed)
            .finish()
    }
}
